//! PyO3 bindings for the arm planner.
//!
//! Notes
//! - Keep bindings thin: plain tuples and nested lists in, nested lists out.
//!   Plotting lives on the Python side.
//! - Every call builds its own planner; there is no state across calls.

mod common;

use common::{cfg_from_py, grid_to_rows, map_planning_err, planner_from_py, PyObstacle};
use pyo3::prelude::*;

type Rows = Vec<Vec<u8>>;

/// Plan from joint angles (degrees) to a workspace point (mm); returns the steps.
#[pyfunction]
#[pyo3(signature = (theta0, theta1, x, y, obstacles=Vec::new(), origin=None, tolerance=None))]
fn plan(
    theta0: i32,
    theta1: i32,
    x: i32,
    y: i32,
    obstacles: Vec<PyObstacle>,
    origin: Option<(i32, i32)>,
    tolerance: Option<i32>,
) -> PyResult<Vec<(i32, i32)>> {
    let mut planner = planner_from_py(cfg_from_py(origin, tolerance)?, obstacles)?;
    let plan = planner
        .plan(theta0, theta1, x, y)
        .map_err(map_planning_err)?;
    Ok(plan.steps().iter().map(|s| (s.theta0, s.theta1)).collect())
}

/// Like `plan`, but also return the annotated C-space and workspace grids.
#[pyfunction]
#[pyo3(signature = (theta0, theta1, x, y, obstacles=Vec::new(), origin=None, tolerance=None))]
fn plan_spaces(
    theta0: i32,
    theta1: i32,
    x: i32,
    y: i32,
    obstacles: Vec<PyObstacle>,
    origin: Option<(i32, i32)>,
    tolerance: Option<i32>,
) -> PyResult<(Vec<(i32, i32)>, Rows, Rows)> {
    let mut planner = planner_from_py(cfg_from_py(origin, tolerance)?, obstacles)?;
    let plan = planner
        .plan(theta0, theta1, x, y)
        .map_err(map_planning_err)?;
    let steps = plan.steps().iter().map(|s| (s.theta0, s.theta1)).collect();
    Ok((
        steps,
        grid_to_rows(planner.path_cspace()),
        grid_to_rows(planner.path_wspace()),
    ))
}

/// Generated C-space as rows of marker values (rows follow theta1).
#[pyfunction]
#[pyo3(signature = (obstacles=Vec::new(), origin=None))]
fn cspace(obstacles: Vec<PyObstacle>, origin: Option<(i32, i32)>) -> PyResult<Rows> {
    let planner = planner_from_py(cfg_from_py(origin, None)?, obstacles)?;
    Ok(grid_to_rows(planner.spaces().cspace()))
}

/// Workspace with obstacle footprints as rows of marker values (rows follow y).
#[pyfunction]
#[pyo3(signature = (obstacles=Vec::new(), origin=None))]
fn wspace(obstacles: Vec<PyObstacle>, origin: Option<(i32, i32)>) -> PyResult<Rows> {
    let planner = planner_from_py(cfg_from_py(origin, None)?, obstacles)?;
    Ok(grid_to_rows(planner.spaces().wspace()))
}

#[pymodule]
fn armplan_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", armplan::VERSION)?;
    m.add_function(wrap_pyfunction!(plan, m)?)?;
    m.add_function(wrap_pyfunction!(plan_spaces, m)?)?;
    m.add_function(wrap_pyfunction!(cspace, m)?)?;
    m.add_function(wrap_pyfunction!(wspace, m)?)?;
    Ok(())
}
