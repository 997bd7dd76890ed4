use armplan::api::{ArmCfg, Grid, Planner, PlanningError, Rectangle};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// Obstacle as two opposite corners `(x0, y0, x1, y1)` in mm.
pub type PyObstacle = (f64, f64, f64, f64);

pub fn cfg_from_py(origin: Option<(i32, i32)>, tolerance: Option<i32>) -> PyResult<ArmCfg> {
    let mut cfg = ArmCfg::default();
    if let Some(o) = origin {
        cfg.origin_mm = o;
    }
    if let Some(t) = tolerance {
        cfg.tolerance_mm = t;
    }
    cfg.validate()
        .map_err(|err| PyValueError::new_err(err.to_string()))?;
    Ok(cfg)
}

pub fn planner_from_py(cfg: ArmCfg, obstacles: Vec<PyObstacle>) -> PyResult<Planner> {
    let rects = obstacles
        .into_iter()
        .map(|(x0, y0, x1, y1)| Rectangle::axis_aligned(x0, y0, x1, y1));
    Planner::with_obstacles(cfg, rects).map_err(map_planning_err)
}

/// Request-level failures are user errors; geometry failures are not.
pub fn map_planning_err(err: PlanningError) -> PyErr {
    match err {
        PlanningError::Geometry(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Row-major marker values, one inner list per row.
pub fn grid_to_rows(grid: &Grid) -> Vec<Vec<u8>> {
    grid.rows()
        .map(|row| row.iter().map(|m| m.as_u8()).collect())
        .collect()
}
