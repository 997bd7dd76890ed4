//! Error taxonomy for configuration, geometry and planning requests.
//!
//! - `GeometryError`: precondition violations (non-finite inputs, bad config).
//! - `CapacityExceeded`: a fixed-capacity list is full.
//! - `PlanningError`: request-level failures surfaced by `Planner::plan`.
//! - `ControlError`: the threaded controller stopped or could not start.
//!
//! All request-level errors are recoverable: a failed request never touches the
//! stored grids and always releases its search nodes.

use std::fmt;

/// Precondition violation in the geometry kernel or the arm configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// An angle was NaN or infinite.
    NonFiniteAngle(f64),
    /// A length or magnitude was NaN or infinite.
    NonFiniteLength(f64),
    /// The arm configuration is inconsistent.
    InvalidConfig { reason: String },
}

impl GeometryError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteAngle(a) => write!(f, "angle {a} is not finite"),
            Self::NonFiniteLength(l) => write!(f, "length {l} is not finite"),
            Self::InvalidConfig { reason } => write!(f, "invalid arm configuration: {reason}"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// A fixed-capacity list (obstacles) is already full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityExceeded {
    pub limit: usize,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capacity of {} entries exceeded", self.limit)
    }
}

impl std::error::Error for CapacityExceeded {}

/// Failure of a single planning request.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanningError {
    /// Start angles or target coordinates outside the configured domain.
    InvalidInput { reason: String },
    /// The start pose is blocked or already carries a marker.
    OccupiedStart { theta0: i32, theta1: i32 },
    /// The target point lies on an obstacle footprint.
    OccupiedTarget { x: i32, y: i32 },
    /// No joint configuration reaches the target within tolerance.
    NoSolutionRegion { x: i32, y: i32, tolerance: i32 },
    /// The search exhausted its frontier (or its node arena).
    NoPathFound,
    /// The reconstructed path does not fit the plan capacity.
    PathTooLong { limit: usize },
    CapacityExceeded(CapacityExceeded),
    Geometry(GeometryError),
}

impl PlanningError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            Self::OccupiedStart { theta0, theta1 } => {
                write!(f, "start pose ({theta0}°, {theta1}°) is not free")
            }
            Self::OccupiedTarget { x, y } => write!(f, "target ({x}, {y}) lies on an obstacle"),
            Self::NoSolutionRegion { x, y, tolerance } => write!(
                f,
                "no joint configuration reaches ({x}, {y}) within {tolerance} mm"
            ),
            Self::NoPathFound => write!(f, "no path found"),
            Self::PathTooLong { limit } => write!(f, "path exceeds {limit} steps"),
            Self::CapacityExceeded(e) => write!(f, "{e}"),
            Self::Geometry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PlanningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CapacityExceeded(e) => Some(e),
            Self::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for PlanningError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<CapacityExceeded> for PlanningError {
    fn from(e: CapacityExceeded) -> Self {
        Self::CapacityExceeded(e)
    }
}

/// Failure in the planning/actuation handoff.
#[derive(Debug)]
pub enum ControlError {
    /// The planning thread is gone; no more requests are accepted.
    Stopped,
    /// A worker thread could not be started.
    Spawn(std::io::Error),
    /// A worker thread panicked.
    Panicked { thread: &'static str },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "controller has stopped"),
            Self::Spawn(e) => write!(f, "failed to spawn controller thread: {e}"),
            Self::Panicked { thread } => write!(f, "{thread} thread panicked"),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}
