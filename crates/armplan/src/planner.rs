//! Planning facade.
//!
//! Purpose
//! - Run one planning request end to end: validate, stage working copies of
//!   both grids, map the solution region, search, and annotate the path.
//! - Own every piece of long-lived state (spaces, staging buffer, search
//!   arena) so a request is a single `&mut self` call.
//!
//! Why this design
//! - The stored grids are read-only during a request. Every marker goes into
//!   the staging copy, so a failed request leaves nothing behind and the next
//!   request starts clean.
//! - `Phase` records how far the last request got, for diagnostics.

use std::fmt;

use tracing::{debug, info, warn};

use crate::cfg::ArmCfg;
use crate::error::{CapacityExceeded, GeometryError, PlanningError};
use crate::geom::{arm_pose, Rectangle};
use crate::search::{GreedySearch, SearchStats};
use crate::solution::{mark_solution_region, SolutionRegion};
use crate::spaces::{Cell, Grid, Marker, Spaces, Staging};

/// One joint-angle pair of a plan, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub theta0: i32,
    pub theta1: i32,
}

impl Step {
    #[inline]
    pub fn new(theta0: i32, theta1: i32) -> Self {
        Self { theta0, theta1 }
    }
}

/// Ordered joint-angle steps from the start pose to a goal pose.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[inline]
    pub fn first(&self) -> Option<Step> {
        self.steps.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<Step> {
        self.steps.last().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

/// Request pipeline stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Staging,
    Mapping,
    Searching,
    Annotating,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Staging => "staging",
            Phase::Mapping => "mapping",
            Phase::Searching => "searching",
            Phase::Annotating => "annotating",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
pub struct Planner {
    spaces: Spaces,
    staging: Staging,
    search: GreedySearch,
    phase: Phase,
    region: SolutionRegion,
}

impl Planner {
    pub fn new(cfg: ArmCfg) -> Result<Self, GeometryError> {
        let spaces = Spaces::new(cfg)?;
        Ok(Self {
            staging: Staging::for_cfg(&cfg),
            search: GreedySearch::for_cfg(&cfg),
            phase: Phase::Idle,
            region: SolutionRegion::default(),
            spaces,
        })
    }

    /// Build a planner, register `obstacles` and generate the C-space.
    pub fn with_obstacles(
        cfg: ArmCfg,
        obstacles: impl IntoIterator<Item = Rectangle>,
    ) -> Result<Self, PlanningError> {
        let mut p = Self::new(cfg)?;
        for o in obstacles {
            p.add_obstacle(o)?;
        }
        p.generate()?;
        Ok(p)
    }

    /// Register an obstacle. The C-space is regenerated lazily on the next request.
    pub fn add_obstacle(&mut self, obstacle: Rectangle) -> Result<(), CapacityExceeded> {
        self.spaces.add_obstacle(obstacle)
    }

    /// Generate the C-space now instead of on the first request.
    pub fn generate(&mut self) -> Result<(), GeometryError> {
        self.spaces.ensure_generated()
    }

    /// Drop every obstacle and return to a blank workspace.
    pub fn reset(&mut self) {
        self.spaces.reset();
        self.cleanup();
    }

    #[inline]
    pub fn cfg(&self) -> &ArmCfg {
        self.spaces.cfg()
    }

    #[inline]
    pub fn spaces(&self) -> &Spaces {
        &self.spaces
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Working C-space of the last request, with start/end/path markers.
    #[inline]
    pub fn path_cspace(&self) -> &Grid {
        &self.staging.cspace
    }

    /// Working workspace of the last request, with start/end/path markers.
    #[inline]
    pub fn path_wspace(&self) -> &Grid {
        &self.staging.wspace
    }

    /// Candidate goals of the last request that reached the mapping phase.
    #[inline]
    pub fn solution_region(&self) -> &SolutionRegion {
        &self.region
    }

    #[inline]
    pub fn search_stats(&self) -> SearchStats {
        self.search.stats()
    }

    /// Clear transient markers from the working grids and return to idle.
    pub fn cleanup(&mut self) {
        self.staging.cleanup();
        self.phase = Phase::Idle;
    }

    /// Plan from joint angles `(theta0, theta1)` in degrees to the workspace
    /// point `(x, y)` in mm.
    pub fn plan(
        &mut self,
        theta0: i32,
        theta1: i32,
        x: i32,
        y: i32,
    ) -> Result<Plan, PlanningError> {
        info!(theta0, theta1, x, y, "planning request");
        let out = self.run(theta0, theta1, x, y);
        match &out {
            Ok(plan) => {
                self.enter(Phase::Done);
                info!(steps = plan.len(), "plan ready");
            }
            Err(e) => {
                self.enter(Phase::Failed);
                warn!(error = %e, "planning failed");
            }
        }
        out
    }

    fn enter(&mut self, phase: Phase) {
        debug!(%phase, "planner phase");
        self.phase = phase;
    }

    fn run(&mut self, theta0: i32, theta1: i32, x: i32, y: i32) -> Result<Plan, PlanningError> {
        let cfg = *self.spaces.cfg();

        self.enter(Phase::Validating);
        let (Some(i0), Some(i1)) = (cfg.index_of(theta0), cfg.index_of(theta1)) else {
            return Err(PlanningError::invalid(format!(
                "start angles ({theta0}°, {theta1}°) are not on the [0, {}) grid of {}° steps",
                cfg.range_deg, cfg.degree_inc
            )));
        };
        let w = cfg.workspace_mm;
        if x < 0 || y < 0 || x >= w || y >= w {
            return Err(PlanningError::invalid(format!(
                "target ({x}, {y}) lies outside the {w} mm workspace"
            )));
        }
        // Occupancy checks need a current C-space.
        self.spaces.ensure_generated()?;
        let start = Cell::new(i0, i1);
        if self.spaces.cspace().get(start) != Marker::Free {
            return Err(PlanningError::OccupiedStart { theta0, theta1 });
        }
        let tip = arm_pose(theta0 as f64, theta1 as f64, &cfg)?.tip;
        let start_ws = cfg
            .workspace_cell(tip)
            .map(|(wx, wy)| Cell::new(wx, wy));
        if let Some(c) = start_ws {
            if self.spaces.wspace().get(c) != Marker::Free {
                return Err(PlanningError::OccupiedStart { theta0, theta1 });
            }
        }
        let target = Cell::new(x as usize, y as usize);
        if self.spaces.wspace().get(target) == Marker::Occupied {
            return Err(PlanningError::OccupiedTarget { x, y });
        }

        self.enter(Phase::Staging);
        self.region = SolutionRegion::default();
        self.spaces.stage_into(&mut self.staging);
        self.staging.cspace.set(start, Marker::Start);
        if let Some(c) = start_ws {
            self.staging.wspace.set(c, Marker::Start);
        }
        self.staging.wspace.set(target, Marker::End);

        self.enter(Phase::Mapping);
        self.region =
            mark_solution_region(&mut self.staging.cspace, &cfg, x, y, cfg.tolerance_mm)?;

        self.enter(Phase::Searching);
        let path = self
            .search
            .run(&self.staging.cspace, start, &self.region.nodes)?;

        self.enter(Phase::Annotating);
        self.annotate(&path, &cfg)?;

        let steps = path
            .iter()
            .map(|c| Step::new(cfg.angle_of(c.x), cfg.angle_of(c.y)))
            .collect();
        Ok(Plan::new(steps))
    }

    /// Paint the path interior in both working grids. Start and end keep
    /// their own markers.
    fn annotate(&mut self, path: &[Cell], cfg: &ArmCfg) -> Result<(), GeometryError> {
        if path.len() < 3 {
            return Ok(());
        }
        for c in &path[1..path.len() - 1] {
            if self.staging.cspace.get(*c) == Marker::Free {
                self.staging.cspace.set(*c, Marker::Path);
            }
            let tip = arm_pose(cfg.angle_of(c.x) as f64, cfg.angle_of(c.y) as f64, cfg)?.tip;
            if let Some((wx, wy)) = cfg.workspace_cell(tip) {
                let wc = Cell::new(wx, wy);
                if self.staging.wspace.get(wc) == Marker::Free {
                    self.staging.wspace.set(wc, Marker::Path);
                }
            }
        }
        Ok(())
    }
}
