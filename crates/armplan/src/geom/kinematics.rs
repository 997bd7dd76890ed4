//! Forward kinematics for the two-link arm.
//!
//! The second link does not rotate the frame of the first. It is evaluated
//! axis-aligned at `theta1 + (theta0 - bias)` and added onto the elbow. This
//! matches how the physical arm was calibrated; do not replace it with a
//! serial-chain composition.

use std::f64::consts::PI;

use nalgebra::Vector2;

use super::types::Segment;
use crate::cfg::ArmCfg;
use crate::error::GeometryError;

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_deg(angle_deg: f64) -> Result<f64, GeometryError> {
    if !angle_deg.is_finite() {
        return Err(GeometryError::NonFiniteAngle(angle_deg));
    }
    let a = angle_deg % 360.0;
    if a < 0.0 {
        return Ok((a + 360.0) % 360.0);
    }
    Ok(a)
}

/// Offset of a link of length `len` at `angle_deg` from its base.
pub fn segment_endpoint(len: f64, angle_deg: f64) -> Result<Vector2<f64>, GeometryError> {
    if !len.is_finite() {
        return Err(GeometryError::NonFiniteLength(len));
    }
    // Keep the `a * PI / 180` evaluation order; calibration depends on it.
    let rad = normalize_deg(angle_deg)? * PI / 180.0;
    Ok(Vector2::new(len * rad.cos(), len * rad.sin()))
}

/// Both links of the arm at joint angles `(theta0, theta1)` in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmPose {
    pub origin: Vector2<f64>,
    pub elbow: Vector2<f64>,
    pub tip: Vector2<f64>,
}

impl ArmPose {
    #[inline]
    pub fn link0(&self) -> Segment {
        Segment::from_points(self.origin, self.elbow)
    }
    #[inline]
    pub fn link1(&self) -> Segment {
        Segment::from_points(self.elbow, self.tip)
    }
}

/// Elbow position for `theta0`.
#[inline]
pub fn elbow(theta0: f64, cfg: &ArmCfg) -> Result<Vector2<f64>, GeometryError> {
    Ok(cfg.origin() + segment_endpoint(cfg.arm_len_mm as f64, theta0)?)
}

/// Tip position given a precomputed elbow.
#[inline]
pub fn tip_from_elbow(
    elbow: Vector2<f64>,
    theta0: f64,
    theta1: f64,
    cfg: &ArmCfg,
) -> Result<Vector2<f64>, GeometryError> {
    let bias = cfg.joint1_bias_deg as f64;
    Ok(elbow + segment_endpoint(cfg.arm_len_mm as f64, theta1 + (theta0 - bias))?)
}

pub fn arm_pose(theta0: f64, theta1: f64, cfg: &ArmCfg) -> Result<ArmPose, GeometryError> {
    let e = elbow(theta0, cfg)?;
    Ok(ArmPose {
        origin: cfg.origin(),
        elbow: e,
        tip: tip_from_elbow(e, theta0, theta1, cfg)?,
    })
}

/// End-effector position for joint angles in degrees.
///
/// `origin + len·(cos θ0, sin θ0) + len·(cos(θ1 + θ0 − bias), sin(θ1 + θ0 − bias))`
pub fn forward_kinematics(
    theta0: f64,
    theta1: f64,
    arm_len: f64,
    bias: f64,
    origin: Vector2<f64>,
) -> Result<Vector2<f64>, GeometryError> {
    let e = origin + segment_endpoint(arm_len, theta0)?;
    Ok(e + segment_endpoint(arm_len, theta1 + (theta0 - bias))?)
}
