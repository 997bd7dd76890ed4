//! Geometry kernel: segments, rectangular obstacles, collision tests and
//! forward kinematics.
//!
//! Purpose
//! - Closed-segment intersection (endpoint touches and collinear overlap count).
//! - Segment/rectangle collision against the four boundary edges.
//! - Perpendicular translation, used to sweep a link across its width plus
//!   clearance.
//! - Joint angles → end-effector point.
//!
//! Conventions
//! - Workspace points are millimetres, joint angles are degrees. The two are
//!   only ever related through [`forward_kinematics`].

mod intersect;
mod kinematics;
mod types;

pub use intersect::intersect;
pub use kinematics::{
    arm_pose, elbow, forward_kinematics, normalize_deg, segment_endpoint, tip_from_elbow, ArmPose,
};
pub use types::{Rectangle, Segment};
