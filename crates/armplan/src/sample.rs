//! Seeded obstacle sampler.
//!
//! Purpose
//! - Reproducible obstacle sets for benches, determinism tests and CLI demos.
//! - A `(seed, index)` token names one obstacle set; the same token always yields
//!   the same rectangles.
//!
//! Obstacles are axis-aligned and clipped to the workspace. The arm base is
//! never covered, so at least the start of a plan has a chance to be free.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cfg::ArmCfg;
use crate::geom::Rectangle;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ObstacleSampleCfg {
    /// Number of rectangles; capped at `ArmCfg::max_obstacles`.
    pub count: usize,
    /// Side lengths are drawn uniformly from `[min_side_mm, max_side_mm]`.
    pub min_side_mm: i32,
    pub max_side_mm: i32,
    /// Keep-out radius around the arm base, in mm.
    pub base_clearance_mm: i32,
}

impl Default for ObstacleSampleCfg {
    fn default() -> Self {
        Self {
            count: 4,
            min_side_mm: 8,
            max_side_mm: 40,
            base_clearance_mm: 40,
        }
    }
}

/// Draw a reproducible set of axis-aligned obstacles inside the workspace.
///
/// Candidates overlapping the base keep-out square are redrawn, up to a fixed
/// number of attempts; the result can therefore hold fewer than `count`
/// rectangles for very crowded settings.
pub fn draw_obstacles(cfg: &ArmCfg, sample: ObstacleSampleCfg, tok: ReplayToken) -> Vec<Rectangle> {
    let mut rng = tok.to_std_rng();
    let count = sample.count.min(cfg.max_obstacles);
    let w = cfg.workspace_mm;
    let lo = sample.min_side_mm.clamp(1, w);
    let hi = sample.max_side_mm.clamp(lo, w);
    let (ox, oy) = cfg.origin_mm;
    let keep = sample.base_clearance_mm.max(0);

    let mut out = Vec::with_capacity(count);
    let mut attempts = 0;
    while out.len() < count && attempts < 64 * count.max(1) {
        attempts += 1;
        let sw = rng.gen_range(lo..=hi);
        let sh = rng.gen_range(lo..=hi);
        let x0 = rng.gen_range(0..=w - sw);
        let y0 = rng.gen_range(0..=w - sh);
        let (x1, y1) = (x0 + sw - 1, y0 + sh - 1);
        let covers_base =
            x0 <= ox + keep && x1 >= ox - keep && y0 <= oy + keep && y1 >= oy - keep;
        if covers_base {
            continue;
        }
        out.push(Rectangle::axis_aligned(
            x0 as f64, y0 as f64, x1 as f64, y1 as f64,
        ));
    }
    out
}
