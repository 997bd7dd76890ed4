use anyhow::{bail, Context, Result};
use armplan::api::{
    draw_obstacles, write_spaces, Actuator, ArmCfg, Controller, MarkerCounts, ObstacleReplay,
    ObstacleSampleCfg, Planner, Step,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::convert::Infallible;
use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod inputs;
mod provenance;

use inputs::{build_planner, load_cfg, load_obstacles, ObstacleSpec};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "armplan")]
#[command(about = "Plan collision-free joint paths for a two-joint arm")]
struct Cmd {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Arm configuration JSON; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Obstacle list JSON: `[{"x0":..,"y0":..,"x1":..,"y1":..}, ...]`
    #[arg(long, global = true)]
    obstacles: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Plan one request and print the steps as JSON
    Plan {
        #[arg(long)]
        theta0: i32,
        #[arg(long)]
        theta1: i32,
        #[arg(long)]
        x: i32,
        #[arg(long)]
        y: i32,
        /// Also write the annotated grids (text dump) plus a provenance sidecar
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// Generate the C-space and write both grids as a text dump
    Cspace {
        #[arg(long)]
        out: PathBuf,
    },
    /// Read `go <x> <y>` lines from stdin and drive a logging actuator
    Serve {
        /// Home pose, degrees
        #[arg(long, default_value_t = 1)]
        theta0: i32,
        #[arg(long, default_value_t = 90)]
        theta1: i32,
    },
    /// Write a reproducible random obstacle list as JSON
    Sample {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = 4)]
        count: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print version and effective configuration as JSON
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let cfg = load_cfg(cmd.config.as_deref())?;
    let obstacles = cmd.obstacles.as_deref();
    match cmd.action {
        Action::Plan {
            theta0,
            theta1,
            x,
            y,
            dump,
        } => plan(cfg, obstacles, Step::new(theta0, theta1), (x, y), dump),
        Action::Cspace { out } => cspace(cfg, obstacles, out),
        Action::Serve { theta0, theta1 } => serve(cfg, obstacles, Step::new(theta0, theta1)),
        Action::Sample {
            seed,
            index,
            count,
            out,
        } => sample(cfg, seed, index, count, out),
        Action::Report => report(cfg),
    }
}

fn plan(
    cfg: ArmCfg,
    obstacles: Option<&Path>,
    start: Step,
    (x, y): (i32, i32),
    dump: Option<PathBuf>,
) -> Result<()> {
    let mut planner = build_planner(cfg, load_obstacles(obstacles)?)?;
    let result = planner.plan(start.theta0, start.theta1, x, y);

    // Dump even on failure: the partially annotated grids show how far it got.
    if let Some(out) = &dump {
        write_dump(&planner, out)?;
        let params = json!({
            "start": start,
            "target": [x, y],
            "cfg": cfg,
            "obstacles": planner.spaces().obstacles().len(),
            "phase": planner.phase().to_string(),
            "ok": result.is_ok(),
        });
        write_sidecar(out, Payload::new("plan", params))?;
    }

    let plan = result.with_context(|| {
        format!(
            "planning from ({}°, {}°) to ({x}, {y})",
            start.theta0, start.theta1
        )
    })?;
    let stats = planner.search_stats();
    let doc = json!({
        "start": start,
        "target": [x, y],
        "steps": plan.steps(),
        "len": plan.len(),
        "candidates": planner.solution_region().nodes.len(),
        "search": {
            "expanded": stats.expanded,
            "allocated": stats.allocated,
            "released_early": stats.released_early,
            "peak_live": stats.peak_live,
        },
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cspace(cfg: ArmCfg, obstacles: Option<&Path>, out: PathBuf) -> Result<()> {
    let planner = build_planner(cfg, load_obstacles(obstacles)?)?;
    write_dump(&planner, &out)?;
    let counts = MarkerCounts::of(planner.spaces().cspace());
    tracing::info!(%counts, "cspace");
    let params = json!({
        "cfg": cfg,
        "obstacles": planner
            .spaces()
            .obstacles()
            .iter()
            .map(ObstacleSpec::from_rect)
            .collect::<Vec<_>>(),
        "cspace": counts,
    });
    write_sidecar(&out, Payload::new("cspace", params))?;
    Ok(())
}

/// Last-request grids when a request ran, the stored grids otherwise.
fn write_dump(planner: &Planner, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dump dir {}", parent.display()))?;
        }
    }
    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut w = BufWriter::new(file);
    let (cs, ws) = match planner.phase() {
        armplan::Phase::Idle => (planner.spaces().cspace(), planner.spaces().wspace()),
        _ => (planner.path_cspace(), planner.path_wspace()),
    };
    write_spaces(&mut w, cs, ws).with_context(|| format!("writing {}", out.display()))?;
    w.flush()?;
    tracing::info!(path = %out.display(), "dump written");
    Ok(())
}

/// Actuator that only logs, for running without hardware.
struct LogActuator;

impl Actuator for LogActuator {
    type Error = Infallible;

    fn set_angles(&mut self, theta0: i32, theta1: i32) -> Result<(), Infallible> {
        tracing::info!(theta0, theta1, "set angles");
        Ok(())
    }
}

fn parse_go(line: &str) -> Result<Option<(i32, i32)>> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => Ok(None),
        Some("go") => {
            let x = parts.next().context("go: missing x")?.parse().context("go: x")?;
            let y = parts.next().context("go: missing y")?.parse().context("go: y")?;
            if parts.next().is_some() {
                bail!("go: expected `go <x> <y>`");
            }
            Ok(Some((x, y)))
        }
        Some(other) => bail!("unknown command {other:?}"),
    }
}

fn serve(cfg: ArmCfg, obstacles: Option<&Path>, home: Step) -> Result<()> {
    let planner = build_planner(cfg, load_obstacles(obstacles)?)?;
    let ctl = Controller::spawn(planner, LogActuator, home)?;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let (x, y) = match parse_go(&line) {
            Ok(Some(t)) => t,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring line");
                continue;
            }
        };
        ctl.submit(x, y)?;
        let outcome = ctl.outcomes().recv().context("controller stopped")?;
        let doc = match &outcome.result {
            Ok(plan) => json!({"target": [x, y], "start": outcome.start, "steps": plan.len()}),
            Err(e) => json!({"target": [x, y], "start": outcome.start, "error": e.to_string()}),
        };
        println!("{doc}");
    }
    ctl.shutdown()?;
    Ok(())
}

fn sample(cfg: ArmCfg, seed: u64, index: u64, count: usize, out: PathBuf) -> Result<()> {
    let sample = ObstacleSampleCfg {
        count,
        ..ObstacleSampleCfg::default()
    };
    let rects = draw_obstacles(&cfg, sample, ObstacleReplay { seed, index });
    let specs: Vec<ObstacleSpec> = rects.iter().map(ObstacleSpec::from_rect).collect();
    fs::write(&out, serde_json::to_vec_pretty(&specs)?)
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(seed, index, obstacles = specs.len(), "obstacles sampled");
    write_sidecar(
        &out,
        Payload::new("sample", json!({"seed": seed, "index": index, "count": count})),
    )?;
    Ok(())
}

fn report(cfg: ArmCfg) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "armplan_version": armplan::VERSION,
        "cfg": cfg,
        "derived": {
            "cspace_dim": cfg.cspace_dim(),
            "wspace_dim": cfg.wspace_dim(),
            "thickness_offsets": cfg.thickness_offsets().collect::<Vec<_>>(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn go_lines_parse() {
        assert_eq!(parse_go("go 170 170").unwrap(), Some((170, 170)));
        assert_eq!(parse_go("   ").unwrap(), None);
        assert!(parse_go("go 1").is_err());
        assert!(parse_go("go a b").is_err());
        assert!(parse_go("stop").is_err());
    }

    #[test]
    fn cspace_dump_has_both_grids_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("run").join("spaces.txt");
        let cfg = ArmCfg {
            range_deg: 180,
            degree_inc: 6,
            ..ArmCfg::default()
        };
        cspace(cfg, None, out.clone()).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "===CSPACE===");
        assert_eq!(lines[1].len(), 30);
        assert_eq!(lines[31], "===CSPACE===");
        assert_eq!(lines[32], "===WSPACE===");
        assert_eq!(lines.last(), Some(&"===DONE==="));
        assert!(dir.path().join("run").join("spaces.provenance.json").exists());
    }

    #[test]
    fn failed_plan_still_dumps() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("plan.txt");
        let err = plan(
            ArmCfg::default(),
            None,
            Step::new(90, 90),
            (0, 394),
            Some(out.clone()),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("no joint configuration"));
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.ends_with("===DONE===\n"));
        let prov: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("plan.provenance.json")).unwrap())
                .unwrap();
        assert_eq!(prov["params"]["ok"], false);
        assert_eq!(prov["params"]["phase"], "failed");
    }

    #[test]
    fn sampled_obstacles_reload() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("obs.json");
        let cfg = ArmCfg::default();
        sample(cfg, 3, 1, 5, out.clone()).unwrap();
        let rects = load_obstacles(Some(&out)).unwrap();
        let expected = draw_obstacles(
            &cfg,
            ObstacleSampleCfg {
                count: 5,
                ..ObstacleSampleCfg::default()
            },
            ObstacleReplay { seed: 3, index: 1 },
        );
        assert_eq!(rects, expected);
    }
}
