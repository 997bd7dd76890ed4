//! Configuration-space motion planning for a two-joint arm.
//!
//! Pipeline: obstacles → C-space generation → (per request) solution-region
//! mapping → greedy best-first search → plan of joint-angle steps.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - `api` collects the re-exports callers are expected to use; anything
//!   else may move without notice.

pub mod api;
pub mod cfg;
pub mod control;
pub mod error;
pub mod geom;
pub mod planner;
pub mod render;
pub mod sample;
pub mod search;
pub mod solution;
pub mod spaces;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::ArmCfg;
pub use error::{CapacityExceeded, ControlError, GeometryError, PlanningError};
pub use planner::{Phase, Plan, Planner, Step};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::ArmCfg;
    pub use crate::error::{CapacityExceeded, GeometryError, PlanningError};
    pub use crate::geom::{forward_kinematics, Rectangle, Segment};
    pub use crate::planner::{Plan, Planner, Step};
    pub use crate::spaces::{Cell, Grid, Marker};
    pub use nalgebra::Vector2 as Vec2;
}
