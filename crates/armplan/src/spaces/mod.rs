//! Workspace and configuration-space store.
//!
//! Purpose
//! - Own the obstacle list and the two dense grids (workspace in mm, C-space in
//!   joint-angle steps) for the lifetime of the planner.
//! - Rasterise obstacle footprints into the workspace on registration.
//! - Generate the C-space once from the obstacle list (see `generate`).
//!
//! Lifecycle
//! - Grids start `Free`. Obstacle cells stay `Occupied` until `reset`.
//! - Planning requests never write here: they copy both grids into a
//!   [`Staging`] buffer and annotate that copy instead.

mod generate;
mod grid;

pub use grid::{Cell, Grid, Marker};

use tracing::{debug, warn};

use crate::cfg::ArmCfg;
use crate::error::{CapacityExceeded, GeometryError};
use crate::geom::Rectangle;

/// Owned obstacle list plus workspace and C-space grids.
#[derive(Clone, Debug)]
pub struct Spaces {
    cfg: ArmCfg,
    obstacles: Vec<Rectangle>,
    wspace: Grid,
    cspace: Grid,
    generated: bool,
}

impl Spaces {
    pub fn new(cfg: ArmCfg) -> Result<Self, GeometryError> {
        cfg.validate()?;
        Ok(Self {
            obstacles: Vec::with_capacity(cfg.max_obstacles),
            wspace: Grid::new(cfg.wspace_dim()),
            cspace: Grid::new(cfg.cspace_dim()),
            generated: false,
            cfg,
        })
    }

    #[inline]
    pub fn cfg(&self) -> &ArmCfg {
        &self.cfg
    }

    /// Drop all obstacles and clear both grids.
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.wspace.fill(Marker::Free);
        self.cspace.fill(Marker::Free);
        self.generated = false;
    }

    /// Register an obstacle and mark its footprint in the workspace.
    ///
    /// Registering after [`Spaces::generate_cspace`] invalidates the C-space;
    /// it must be regenerated before planning.
    pub fn add_obstacle(&mut self, obstacle: Rectangle) -> Result<(), CapacityExceeded> {
        if self.obstacles.len() >= self.cfg.max_obstacles {
            return Err(CapacityExceeded {
                limit: self.cfg.max_obstacles,
            });
        }
        if self.generated {
            warn!("obstacle added after C-space generation; C-space must be regenerated");
            self.generated = false;
        }
        self.mark_obstacle(&obstacle);
        self.obstacles.push(obstacle);
        Ok(())
    }

    /// Rasterise the obstacle's bounding box, keeping only cells inside the
    /// rectangle.
    fn mark_obstacle(&mut self, obstacle: &Rectangle) {
        let (lo, hi) = obstacle.bounding_box();
        let last = self.wspace.dim() as i64 - 1;
        let x0 = (lo.x.floor() as i64).max(0);
        let y0 = (lo.y.floor() as i64).max(0);
        let x1 = (hi.x.ceil() as i64).min(last);
        let y1 = (hi.y.ceil() as i64).min(last);
        let mut marked = 0usize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = nalgebra::Vector2::new(x as f64, y as f64);
                if obstacle.contains(p) {
                    self.wspace
                        .set(Cell::new(x as usize, y as usize), Marker::Occupied);
                    marked += 1;
                }
            }
        }
        debug!(marked, "obstacle footprint rasterised");
    }

    #[inline]
    pub fn obstacles(&self) -> &[Rectangle] {
        &self.obstacles
    }

    #[inline]
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Generate the C-space unless it is already current.
    pub fn ensure_generated(&mut self) -> Result<(), GeometryError> {
        if !self.generated {
            self.generate_cspace()?;
        }
        Ok(())
    }

    #[inline]
    pub fn wspace(&self) -> &Grid {
        &self.wspace
    }

    #[inline]
    pub fn cspace(&self) -> &Grid {
        &self.cspace
    }

    /// Copy both grids into a request-local working buffer.
    pub fn stage_into(&self, staging: &mut Staging) {
        staging.wspace.copy_from(&self.wspace);
        staging.cspace.copy_from(&self.cspace);
    }
}

/// Request-local working copy of both grids.
///
/// Allocated once per planner and overwritten by every request, so transient
/// start/end/path markers never leak between requests.
#[derive(Clone, Debug)]
pub struct Staging {
    pub wspace: Grid,
    pub cspace: Grid,
}

impl Staging {
    pub fn for_cfg(cfg: &ArmCfg) -> Self {
        Self {
            wspace: Grid::new(cfg.wspace_dim()),
            cspace: Grid::new(cfg.cspace_dim()),
        }
    }

    /// Reset every non-occupied cell back to `Free`.
    pub fn cleanup(&mut self) {
        self.wspace.clear_transient();
        self.cspace.clear_transient();
    }
}

#[cfg(test)]
mod tests;
