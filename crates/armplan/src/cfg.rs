//! Arm and workspace constants.
//!
//! Everything here is fixed at init time and passed by reference (or copied)
//! into every component. Defaults describe the reference arm: two 100 mm links
//! with 180° of travel each, based 30 mm above the bottom edge of a 395 mm
//! square workspace.

use nalgebra::Vector2;

use crate::error::GeometryError;

/// Arm geometry, discretisation and capacity limits.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArmCfg {
    /// Side of the square workspace in mm (1 grid cell = 1 mm).
    pub workspace_mm: i32,
    /// Length of each link in mm.
    pub arm_len_mm: i32,
    /// Physical width of each link in mm.
    pub arm_width_mm: i32,
    /// Required gap between a link edge and any obstacle, in mm.
    pub clearance_mm: i32,
    /// Travel of each joint in degrees.
    pub range_deg: i32,
    /// C-space resolution in degrees.
    pub degree_inc: i32,
    /// Base joint position in workspace mm.
    pub origin_mm: (i32, i32),
    /// Bias subtracted from `theta0` when evaluating the second link.
    ///
    /// The second link is evaluated axis-aligned at `theta1 + theta0 - bias`.
    /// This is a calibration constant of the physical arm.
    pub joint1_bias_deg: i32,
    /// Per-axis target tolerance in mm.
    pub tolerance_mm: i32,
    pub max_obstacles: usize,
    /// Capacity of the candidate-goal list fed to the search heuristic.
    pub solution_nodes: usize,
    /// Capacity of a plan, in steps.
    pub max_steps: usize,
    /// Capacity of the search node arena.
    pub arena_nodes: usize,
    /// Actuator settle delay between steps, in ms.
    pub settle_ms: u64,
}

impl Default for ArmCfg {
    fn default() -> Self {
        let workspace_mm = 395;
        let range_deg = 180;
        Self {
            workspace_mm,
            arm_len_mm: 100,
            arm_width_mm: 30,
            clearance_mm: 3,
            range_deg,
            degree_inc: 1,
            origin_mm: (workspace_mm / 2, 30),
            joint1_bias_deg: range_deg / 2,
            tolerance_mm: 1,
            max_obstacles: 10,
            solution_nodes: 5,
            max_steps: 300,
            arena_nodes: 16384,
            settle_ms: 25,
        }
    }
}

impl ArmCfg {
    /// Check internal consistency. Every store and planner validates on construction.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.workspace_mm <= 0 {
            return Err(GeometryError::config("workspace must be positive"));
        }
        if self.arm_len_mm <= 0 {
            return Err(GeometryError::config("arm length must be positive"));
        }
        if self.arm_width_mm < 0 || self.clearance_mm < 0 {
            return Err(GeometryError::config(
                "arm width and clearance must be non-negative",
            ));
        }
        if self.degree_inc <= 0 || self.range_deg <= 0 {
            return Err(GeometryError::config(
                "angular range and increment must be positive",
            ));
        }
        if self.range_deg % self.degree_inc != 0 {
            return Err(GeometryError::config(format!(
                "range {}° is not a multiple of the {}° increment",
                self.range_deg, self.degree_inc
            )));
        }
        let (ox, oy) = self.origin_mm;
        if ox < 0 || oy < 0 || ox >= self.workspace_mm || oy >= self.workspace_mm {
            return Err(GeometryError::config(format!(
                "origin ({ox}, {oy}) lies outside the workspace"
            )));
        }
        if self.tolerance_mm < 0 {
            return Err(GeometryError::config("tolerance must be non-negative"));
        }
        if self.solution_nodes == 0 || self.max_steps == 0 || self.arena_nodes == 0 {
            return Err(GeometryError::config("capacities must be non-zero"));
        }
        Ok(())
    }

    /// Side of the square workspace grid.
    #[inline]
    pub fn wspace_dim(&self) -> usize {
        self.workspace_mm as usize
    }

    /// Side of the square C-space grid (`range / increment`).
    #[inline]
    pub fn cspace_dim(&self) -> usize {
        (self.range_deg / self.degree_inc) as usize
    }

    #[inline]
    pub fn origin(&self) -> Vector2<f64> {
        Vector2::new(self.origin_mm.0 as f64, self.origin_mm.1 as f64)
    }

    /// Joint angle (degrees) of C-space index `i`.
    #[inline]
    pub fn angle_of(&self, i: usize) -> i32 {
        i as i32 * self.degree_inc
    }

    /// C-space index of a joint angle, if it lies on the grid.
    pub fn index_of(&self, angle: i32) -> Option<usize> {
        if angle < 0 || angle >= self.range_deg || angle % self.degree_inc != 0 {
            return None;
        }
        Some((angle / self.degree_inc) as usize)
    }

    /// Perpendicular offsets (mm) swept across the link to model its width
    /// plus clearance: `-(w/2 + c) ..= (w/2 + c)` in `(w + 2c) / 4` steps.
    pub fn thickness_offsets(&self) -> impl Iterator<Item = f64> {
        let half = self.arm_width_mm / 2 + self.clearance_mm;
        let step = ((self.arm_width_mm + 2 * self.clearance_mm) / 4).max(1);
        (-half..=half).step_by(step as usize).map(f64::from)
    }

    /// Workspace cell of a physical point (ceiling to whole mm), if it lies
    /// inside the grid.
    pub fn workspace_cell(&self, p: Vector2<f64>) -> Option<(usize, usize)> {
        let x = p.x.ceil();
        let y = p.y.ceil();
        let w = self.workspace_mm as f64;
        if !(x >= 0.0 && x < w && y >= 0.0 && y < w) {
            return None;
        }
        Some((x as usize, y as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_and_matches_reference_arm() {
        let cfg = ArmCfg::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.cspace_dim(), 180);
        assert_eq!(cfg.wspace_dim(), 395);
        assert_eq!(cfg.origin_mm, (197, 30));
        assert_eq!(cfg.joint1_bias_deg, 90);
    }

    #[test]
    fn thickness_offsets_span_width_and_clearance() {
        let offs: Vec<f64> = ArmCfg::default().thickness_offsets().collect();
        assert_eq!(offs, vec![-18.0, -9.0, 0.0, 9.0, 18.0]);
    }

    #[test]
    fn index_of_rejects_off_grid_angles() {
        let cfg = ArmCfg {
            degree_inc: 2,
            ..ArmCfg::default()
        };
        assert_eq!(cfg.index_of(4), Some(2));
        assert_eq!(cfg.index_of(3), None);
        assert_eq!(cfg.index_of(-2), None);
        assert_eq!(cfg.index_of(180), None);
        assert_eq!(cfg.angle_of(89), 178);
    }

    #[test]
    fn validate_rejects_inconsistent_configs() {
        let bad_range = ArmCfg {
            degree_inc: 7,
            ..ArmCfg::default()
        };
        assert!(bad_range.validate().is_err());
        let bad_origin = ArmCfg {
            origin_mm: (400, 0),
            ..ArmCfg::default()
        };
        assert!(bad_origin.validate().is_err());
    }

    #[test]
    fn workspace_cell_rounds_up() {
        let cfg = ArmCfg::default();
        assert_eq!(cfg.workspace_cell(Vector2::new(10.2, 3.0)), Some((11, 3)));
        assert_eq!(cfg.workspace_cell(Vector2::new(394.0, 0.0)), Some((394, 0)));
        assert_eq!(cfg.workspace_cell(Vector2::new(394.01, 0.0)), None);
        assert_eq!(cfg.workspace_cell(Vector2::new(-0.5, 0.0)), Some((0, 0)));
        assert_eq!(cfg.workspace_cell(Vector2::new(-1.5, 0.0)), None);
    }
}
