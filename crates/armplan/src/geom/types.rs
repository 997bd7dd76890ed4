//! Segments and rectangles in workspace millimetres.

use nalgebra::Vector2;

use super::intersect::intersect;

/// Endpoints closer than this are the same corner.
const CORNER_EPS: f64 = 1e-9;

/// Directed segment `a → b`.
///
/// Direction is irrelevant for collision tests but fixes the sign of
/// [`Segment::translate`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment {
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            a: Vector2::new(x1, y1),
            b: Vector2::new(x2, y2),
        }
    }

    #[inline]
    pub fn from_points(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn dir(&self) -> Vector2<f64> {
        self.b - self.a
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.dir().norm()
    }

    /// Offset perpendicular to the direction by `magnitude` along the unit
    /// normal `(-dy, dx) / len`. Positive magnitudes move to the left of `a → b`.
    ///
    /// A zero-length segment has no normal and is returned unchanged.
    pub fn translate(&self, magnitude: f64) -> Segment {
        let d = self.dir();
        let len = d.norm();
        if len == 0.0 {
            return *self;
        }
        let shift = Vector2::new(-d.y / len, d.x / len) * magnitude;
        Segment {
            a: self.a + shift,
            b: self.b + shift,
        }
    }

    /// Closed-segment intersection test; endpoint touches count.
    #[inline]
    pub fn intersects(&self, other: &Segment) -> bool {
        intersect(self, other)
    }
}

/// Obstacle boundary given as four segments.
///
/// Edge direction carries no meaning; the corners are recovered from the
/// endpoints. The shape must be convex for [`Rectangle::contains`] to be
/// meaningful.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    pub bottom: Segment,
    pub top: Segment,
    pub left: Segment,
    pub right: Segment,
}

impl Rectangle {
    /// Axis-aligned rectangle spanning the two corners (any order).
    pub fn axis_aligned(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (lx, hx) = (x0.min(x1), x0.max(x1));
        let (ly, hy) = (y0.min(y1), y0.max(y1));
        Self {
            bottom: Segment::new(lx, ly, hx, ly),
            top: Segment::new(lx, hy, hx, hy),
            left: Segment::new(lx, ly, lx, hy),
            right: Segment::new(hx, ly, hx, hy),
        }
    }

    #[inline]
    pub fn edges(&self) -> [Segment; 4] {
        [self.bottom, self.top, self.left, self.right]
    }

    /// Distinct edge endpoints in counter-clockwise order around their
    /// centroid. A degenerate rectangle with fewer than four distinct corners
    /// repeats its last one.
    pub fn corners(&self) -> [Vector2<f64>; 4] {
        let mut pts = [Vector2::zeros(); 8];
        let mut n = 0;
        for e in self.edges() {
            for p in [e.a, e.b] {
                if !pts[..n].iter().any(|q| (q - p).norm() <= CORNER_EPS) {
                    pts[n] = p;
                    n += 1;
                }
            }
        }
        let centre = pts[..n].iter().fold(Vector2::zeros(), |acc, p| acc + *p) / n as f64;
        let angle = |p: &Vector2<f64>| {
            let d = p - centre;
            d.y.atan2(d.x)
        };
        pts[..n].sort_by(|p, q| angle(p).total_cmp(&angle(q)));

        let mut out = [pts[n - 1]; 4];
        for (slot, p) in out.iter_mut().zip(&pts[..n]) {
            *slot = *p;
        }
        out
    }

    /// Componentwise min/max over all edge endpoints.
    pub fn bounding_box(&self) -> (Vector2<f64>, Vector2<f64>) {
        let mut lo = Vector2::repeat(f64::INFINITY);
        let mut hi = Vector2::repeat(f64::NEG_INFINITY);
        for e in self.edges() {
            for p in [e.a, e.b] {
                lo = lo.inf(&p);
                hi = hi.sup(&p);
            }
        }
        (lo, hi)
    }

    /// Inside-or-on-boundary test: the cross products of every corner edge
    /// with `p` share a sign (zeros allowed).
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        let c = self.corners();
        let mut pos = false;
        let mut neg = false;
        for i in 0..4 {
            let edge = c[(i + 1) % 4] - c[i];
            let cross = edge.perp(&(p - c[i]));
            pos |= cross > 0.0;
            neg |= cross < 0.0;
        }
        !(pos && neg)
    }

    /// True iff `seg` intersects any of the four boundary segments.
    ///
    /// A segment lying strictly inside the rectangle does not collide; arm
    /// links always start outside an obstacle, so they must cross the boundary.
    pub fn collides_with(&self, seg: &Segment) -> bool {
        self.edges().iter().any(|e| intersect(seg, e))
    }
}
