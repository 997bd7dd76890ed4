//! C-space generation.
//!
//! For every `theta0` the first link is swept across its width; a collision
//! there makes every `theta1` moot, so the whole `theta0` column is occupied.
//! Otherwise each `theta1` is checked for a second-link collision and for a tip
//! that falls outside the workspace grid.
//!
//! The result is a pure function of the obstacle list and `ArmCfg`.

use tracing::{debug, info};

use super::{Cell, Marker, Spaces};
use crate::error::GeometryError;
use crate::geom::{elbow, tip_from_elbow, Segment};

impl Spaces {
    /// Sweep the full joint-angle domain and mark colliding or unreachable
    /// poses as `Occupied`.
    pub fn generate_cspace(&mut self) -> Result<(), GeometryError> {
        info!(
            obstacles = self.obstacles.len(),
            dim = self.cfg.cspace_dim(),
            "generating configuration space"
        );
        let cfg = self.cfg;
        let dim = cfg.cspace_dim();
        let origin = cfg.origin();
        self.cspace.fill(Marker::Free);

        let mut last_decile = 0;
        for i0 in 0..dim {
            let decile = i0 * 10 / dim;
            if decile != last_decile {
                last_decile = decile;
                debug!(percent = decile * 10, "generating configuration space");
            }
            let theta0 = cfg.angle_of(i0) as f64;
            let e = elbow(theta0, &cfg)?;

            if self.link_collides(&Segment::from_points(origin, e)) {
                debug!(theta0, "first link collides; occupying column");
                for i1 in 0..dim {
                    self.cspace.set(Cell::new(i0, i1), Marker::Occupied);
                }
                continue;
            }

            for i1 in 0..dim {
                let theta1 = cfg.angle_of(i1) as f64;
                let tip = tip_from_elbow(e, theta0, theta1, &cfg)?;
                let blocked = self.link_collides(&Segment::from_points(e, tip))
                    || cfg.workspace_cell(tip).is_none();
                if blocked {
                    self.cspace.set(Cell::new(i0, i1), Marker::Occupied);
                }
            }
        }

        self.generated = true;
        info!(
            occupied = self.cspace.count(Marker::Occupied),
            "configuration space generated"
        );
        Ok(())
    }

    /// A link collides if any of its width offsets crosses any obstacle edge.
    fn link_collides(&self, link: &Segment) -> bool {
        self.obstacles.iter().any(|obstacle| {
            self.cfg
                .thickness_offsets()
                .any(|m| obstacle.collides_with(&link.translate(m)))
        })
    }
}
