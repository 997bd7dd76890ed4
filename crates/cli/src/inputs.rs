//! JSON inputs: arm configuration and obstacle lists.

use anyhow::{Context, Result};
use armplan::api::{ArmCfg, Planner, Rectangle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Axis-aligned obstacle as two opposite corners, in workspace mm.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl ObstacleSpec {
    pub fn to_rect(self) -> Rectangle {
        Rectangle::axis_aligned(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn from_rect(r: &Rectangle) -> Self {
        let (lo, hi) = r.bounding_box();
        Self {
            x0: lo.x,
            y0: lo.y,
            x1: hi.x,
            y1: hi.y,
        }
    }
}

/// Read an `ArmCfg` from JSON; missing fields keep their defaults.
pub fn load_cfg(path: Option<&Path>) -> Result<ArmCfg> {
    let cfg = match path {
        Some(p) => {
            let bytes = fs::read(p).with_context(|| format!("reading config {}", p.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing config {}", p.display()))?
        }
        None => ArmCfg::default(),
    };
    cfg.validate().context("validating arm configuration")?;
    Ok(cfg)
}

/// Read a JSON array of [`ObstacleSpec`]; no file means no obstacles.
pub fn load_obstacles(path: Option<&Path>) -> Result<Vec<Rectangle>> {
    let Some(p) = path else {
        return Ok(Vec::new());
    };
    let bytes = fs::read(p).with_context(|| format!("reading obstacles {}", p.display()))?;
    let specs: Vec<ObstacleSpec> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing obstacles {}", p.display()))?;
    Ok(specs.into_iter().map(ObstacleSpec::to_rect).collect())
}

/// Planner with every obstacle registered and the C-space generated.
pub fn build_planner(cfg: ArmCfg, obstacles: Vec<Rectangle>) -> Result<Planner> {
    let n = obstacles.len();
    let planner = Planner::with_obstacles(cfg, obstacles)
        .with_context(|| format!("loading {n} obstacles"))?;
    tracing::info!(
        obstacles = n,
        occupied = planner.spaces().cspace().count(armplan::api::Marker::Occupied),
        "planner ready"
    );
    Ok(planner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("cfg.json");
        fs::write(&p, r#"{"origin_mm": [100, 30], "tolerance_mm": 2}"#).unwrap();
        let cfg = load_cfg(Some(&p)).unwrap();
        assert_eq!(cfg.origin_mm, (100, 30));
        assert_eq!(cfg.tolerance_mm, 2);
        assert_eq!(cfg.arm_len_mm, ArmCfg::default().arm_len_mm);
    }

    #[test]
    fn inconsistent_config_is_rejected() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("cfg.json");
        fs::write(&p, r#"{"degree_inc": 7}"#).unwrap();
        let err = load_cfg(Some(&p)).unwrap_err();
        assert!(format!("{err:#}").contains("not a multiple"));
    }

    #[test]
    fn obstacles_load_as_rectangles() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("obs.json");
        let specs = vec![ObstacleSpec {
            x0: 250.0,
            y0: 80.0,
            x1: 260.0,
            y1: 90.0,
        }];
        fs::write(&p, serde_json::to_vec(&specs).unwrap()).unwrap();
        let rects = load_obstacles(Some(&p)).unwrap();
        assert_eq!(rects, vec![specs[0].to_rect()]);
        assert_eq!(ObstacleSpec::from_rect(&rects[0]), specs[0]);
        assert!(load_obstacles(None).unwrap().is_empty());
    }

    #[test]
    fn too_many_obstacles_fail_with_context() {
        let cfg = ArmCfg {
            max_obstacles: 1,
            ..ArmCfg::default()
        };
        let rects = vec![
            Rectangle::axis_aligned(0.0, 0.0, 1.0, 1.0),
            Rectangle::axis_aligned(5.0, 5.0, 6.0, 6.0),
        ];
        let err = build_planner(cfg, rects).unwrap_err();
        assert!(format!("{err:#}").contains("capacity of 1"));
    }
}
