//! Threaded handoff between planning and actuation.
//!
//! Two threads:
//! - planning: owns the [`Planner`], takes one target at a time from a
//!   depth-1 queue (submitting blocks while a request is pending), plans from
//!   the tracked arm pose and forwards successful plans;
//! - actuation: owns the [`Actuator`], drives every step of a plan in order
//!   and sleeps `ArmCfg::settle_ms` after each one. There is no position
//!   feedback, so the delay is the only synchronisation with the servos.
//!
//! The planner is only ever touched by its thread, so the core needs no locks.

use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::{ControlError, PlanningError};
use crate::planner::{Plan, Planner, Step};

/// Sink for joint angles, e.g. a servo driver.
pub trait Actuator: Send + 'static {
    type Error: fmt::Display;

    fn set_angles(&mut self, theta0: i32, theta1: i32) -> Result<(), Self::Error>;
}

/// Workspace point to move the tip to, in mm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub x: i32,
    pub y: i32,
}

/// Result of one submitted request.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub target: Target,
    /// Pose the request was planned from.
    pub start: Step,
    pub result: Result<Plan, PlanningError>,
}

pub struct Controller {
    requests: Option<SyncSender<Target>>,
    outcomes: Receiver<Outcome>,
    planning: Option<JoinHandle<Planner>>,
    actuation: Option<JoinHandle<()>>,
}

impl Controller {
    /// Start both threads and home the arm to `home`.
    pub fn spawn<A: Actuator>(
        planner: Planner,
        actuator: A,
        home: Step,
    ) -> Result<Self, ControlError> {
        let settle = Duration::from_millis(planner.cfg().settle_ms);
        let (req_tx, req_rx) = mpsc::sync_channel::<Target>(1);
        let (plan_tx, plan_rx) = mpsc::sync_channel::<Plan>(1);
        let (out_tx, out_rx) = mpsc::channel::<Outcome>();

        let actuation = thread::Builder::new()
            .name("actuation".into())
            .spawn(move || actuation_loop(actuator, plan_rx, settle))
            .map_err(ControlError::Spawn)?;

        let planning = thread::Builder::new()
            .name("planning".into())
            .spawn(move || planning_loop(planner, home, req_rx, plan_tx, out_tx))
            .map_err(ControlError::Spawn)?;

        Ok(Self {
            requests: Some(req_tx),
            outcomes: out_rx,
            planning: Some(planning),
            actuation: Some(actuation),
        })
    }

    /// Queue a target. Blocks while another request is waiting.
    pub fn submit(&self, x: i32, y: i32) -> Result<(), ControlError> {
        let tx = self.requests.as_ref().ok_or(ControlError::Stopped)?;
        tx.send(Target { x, y }).map_err(|_| ControlError::Stopped)
    }

    /// Per-request outcomes, in submission order.
    pub fn outcomes(&self) -> &Receiver<Outcome> {
        &self.outcomes
    }

    /// Finish queued work, stop both threads and hand the planner back.
    pub fn shutdown(mut self) -> Result<Planner, ControlError> {
        self.requests.take();
        let planner = match self.planning.take() {
            Some(h) => h.join().map_err(|_| ControlError::Panicked { thread: "planning" })?,
            None => return Err(ControlError::Stopped),
        };
        if let Some(h) = self.actuation.take() {
            h.join()
                .map_err(|_| ControlError::Panicked { thread: "actuation" })?;
        }
        info!("controller stopped");
        Ok(planner)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(h) = self.planning.take() {
            let _ = h.join();
        }
        if let Some(h) = self.actuation.take() {
            let _ = h.join();
        }
    }
}

fn planning_loop(
    mut planner: Planner,
    home: Step,
    requests: Receiver<Target>,
    plans: SyncSender<Plan>,
    outcomes: mpsc::Sender<Outcome>,
) -> Planner {
    info!(theta0 = home.theta0, theta1 = home.theta1, "homing arm");
    if plans.send(Plan::new(vec![home])).is_err() {
        error!("actuation thread gone before homing");
        return planner;
    }
    let mut pose = home;
    info!("controller ready");

    for target in requests {
        info!(x = target.x, y = target.y, "calculating path");
        let result = planner.plan(pose.theta0, pose.theta1, target.x, target.y);
        let start = pose;
        if let Ok(plan) = &result {
            if plans.send(plan.clone()).is_err() {
                error!("actuation thread gone; dropping plan");
                planner.cleanup();
                break;
            }
            if let Some(last) = plan.last() {
                pose = last;
            }
        }
        planner.cleanup();
        // Nobody listening is fine.
        let _ = outcomes.send(Outcome {
            target,
            start,
            result,
        });
    }
    planner
}

fn actuation_loop<A: Actuator>(mut actuator: A, plans: Receiver<Plan>, settle: Duration) {
    for plan in plans {
        info!(steps = plan.len(), "executing plan");
        for (i, s) in plan.steps().iter().enumerate() {
            debug!(step = i, theta0 = s.theta0, theta1 = s.theta1, "step");
            if let Err(e) = actuator.set_angles(s.theta0, s.theta1) {
                warn!(step = i, error = %e, "actuator rejected step");
            }
            thread::sleep(settle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::ArmCfg;
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Step>>>);

    impl Actuator for Recorder {
        type Error = Infallible;

        fn set_angles(&mut self, theta0: i32, theta1: i32) -> Result<(), Infallible> {
            self.0.lock().unwrap().push(Step::new(theta0, theta1));
            Ok(())
        }
    }

    fn controller(rec: &Recorder) -> Controller {
        let cfg = ArmCfg {
            origin_mm: (100, 30),
            settle_ms: 0,
            ..ArmCfg::default()
        };
        let planner = Planner::new(cfg).unwrap();
        Controller::spawn(planner, rec.clone(), Step::new(0, 90)).unwrap()
    }

    #[test]
    fn homes_then_executes_plans_from_tracked_pose() {
        let rec = Recorder::default();
        let ctl = controller(&rec);

        ctl.submit(170, 170).unwrap();
        let first = ctl.outcomes().recv().unwrap();
        assert_eq!(first.start, Step::new(0, 90));
        let plan = first.result.unwrap();
        let reached = plan.last().unwrap();

        // Already within tolerance: a one-step plan from the tracked pose.
        ctl.submit(170, 170).unwrap();
        let second = ctl.outcomes().recv().unwrap();
        assert_eq!(second.start, reached);
        assert_eq!(second.result.unwrap().steps(), &[reached]);

        let planner = ctl.shutdown().unwrap();
        assert_eq!(planner.path_cspace(), planner.spaces().cspace());

        let steps = rec.0.lock().unwrap().clone();
        assert_eq!(steps[0], Step::new(0, 90));
        assert_eq!(&steps[1..=plan.len()], plan.steps());
        assert_eq!(steps.len(), 1 + plan.len() + 1);
    }

    #[test]
    fn failed_request_keeps_pose() {
        let rec = Recorder::default();
        let ctl = controller(&rec);

        ctl.submit(0, 394).unwrap();
        let failed = ctl.outcomes().recv().unwrap();
        assert!(matches!(
            failed.result,
            Err(PlanningError::NoSolutionRegion { .. })
        ));

        ctl.submit(170, 170).unwrap();
        let ok = ctl.outcomes().recv().unwrap();
        assert_eq!(ok.start, Step::new(0, 90));
        assert!(ok.result.is_ok());
        ctl.shutdown().unwrap();
    }
}
