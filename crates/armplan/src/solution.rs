//! Solution-region mapper.
//!
//! Scans the full C-space and marks every joint configuration whose tip lands
//! within a per-axis tolerance of the target point. The first
//! `ArmCfg::solution_nodes` matches become the candidate goals that steer the
//! search heuristic; later matches are still marked (any of them terminates the
//! search) but are not used for the heuristic.

use tracing::{debug, info, warn};

use crate::cfg::ArmCfg;
use crate::error::PlanningError;
use crate::geom::{elbow, tip_from_elbow};
use crate::spaces::{Cell, Grid, Marker};

/// Candidate goals found by [`mark_solution_region`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionRegion {
    /// Capacity-bounded candidate list, in scan order (`theta0` major).
    pub nodes: Vec<Cell>,
    /// Matches beyond capacity; marked but not kept.
    pub dropped: usize,
}

impl SolutionRegion {
    /// Total number of cells marked `End`.
    #[inline]
    pub fn marked(&self) -> usize {
        self.nodes.len() + self.dropped
    }
}

/// Mark every non-occupied cell of `cspace` whose ceiled tip position lies
/// within `tolerance` mm of `(x, y)` on both axes.
pub fn mark_solution_region(
    cspace: &mut Grid,
    cfg: &ArmCfg,
    x: i32,
    y: i32,
    tolerance: i32,
) -> Result<SolutionRegion, PlanningError> {
    if tolerance < 0 {
        return Err(PlanningError::invalid("tolerance must be non-negative"));
    }
    let dim = cfg.cspace_dim();
    let target = (x as f64, y as f64);
    let tol = tolerance as f64;
    let mut region = SolutionRegion {
        nodes: Vec::with_capacity(cfg.solution_nodes),
        dropped: 0,
    };

    for i0 in 0..dim {
        let theta0 = cfg.angle_of(i0) as f64;
        let e = elbow(theta0, cfg)?;
        for i1 in 0..dim {
            let tip = tip_from_elbow(e, theta0, cfg.angle_of(i1) as f64, cfg)?;
            let hit = (tip.x.ceil() - target.0).abs() <= tol
                && (tip.y.ceil() - target.1).abs() <= tol;
            if !hit {
                continue;
            }
            let cell = Cell::new(i0, i1);
            if cspace.get(cell) == Marker::Occupied {
                continue;
            }
            cspace.set(cell, Marker::End);
            if region.nodes.len() < cfg.solution_nodes {
                debug!(theta0, theta1 = cfg.angle_of(i1), "solution node");
                region.nodes.push(cell);
            } else {
                region.dropped += 1;
            }
        }
    }

    if region.dropped > 0 {
        warn!(
            dropped = region.dropped,
            limit = cfg.solution_nodes,
            "solution node list full; extra matches kept as markers only"
        );
    }
    if region.nodes.is_empty() {
        return Err(PlanningError::NoSolutionRegion { x, y, tolerance });
    }
    info!(
        candidates = region.nodes.len(),
        marked = region.marked(),
        "solution region mapped"
    );
    Ok(region)
}
