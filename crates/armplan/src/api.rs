//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI, the
//!   Python bindings and benches. Breaking changes are allowed and expected.

// Configuration and errors
pub use crate::cfg::ArmCfg;
pub use crate::error::{CapacityExceeded, ControlError, GeometryError, PlanningError};
// Geometry kernel
pub use crate::geom::{
    arm_pose, forward_kinematics, intersect, normalize_deg, segment_endpoint, ArmPose, Rectangle,
    Segment,
};
// Grids and planning
pub use crate::planner::{Phase, Plan, Planner, Step};
pub use crate::search::{GreedySearch, SearchStats};
pub use crate::solution::{mark_solution_region, SolutionRegion};
pub use crate::spaces::{Cell, Grid, Marker, Spaces};
// Diagnostics and samples
pub use crate::render::{render_spaces, write_spaces, MarkerCounts};
pub use crate::sample::{draw_obstacles, ObstacleSampleCfg, ReplayToken as ObstacleReplay};
// Control handoff
pub use crate::control::{Actuator, Controller, Outcome, Target};
