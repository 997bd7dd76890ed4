//! Segment–segment intersection.
//!
//! Write both segments parametrically, `A + x·AB` and `C + z·CD`, and solve
//! `A + x·AB = C + z·CD`:
//!
//! ```text
//!     CD × AC       AB × AC
//! x = -------   z = -------      with  b = CD × AB
//!        b             b
//! ```
//!
//! - `b == 0`: the lines are parallel. If additionally both numerators vanish
//!   the segments are collinear and the test reduces to 1-D range overlap.
//! - otherwise the segments meet iff `x, z ∈ [0, 1]` (endpoint touches count).
//!
//! Requiring *both* numerators to vanish in the collinear case keeps the test
//! symmetric in its arguments: swapping the segments maps `(a, b, c)` to
//! `(-c, -b, -a)` exactly in floating point.

use super::types::Segment;

/// Closed-segment intersection test.
pub fn intersect(s1: &Segment, s2: &Segment) -> bool {
    let d1 = s1.dir();
    let d2 = s2.dir();
    let w = s2.a - s1.a;

    let b = d2.perp(&d1);
    let a = d2.perp(&w);
    let c = d1.perp(&w);

    if b == 0.0 {
        if a == 0.0 && c == 0.0 {
            return ranges_overlap(s1, s2);
        }
        return false;
    }

    let x = a / b;
    let z = c / b;
    (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&z)
}

/// Bounding-range overlap on both axes; for collinear segments this is the
/// 1-D overlap test on whichever axis has extent.
fn ranges_overlap(s1: &Segment, s2: &Segment) -> bool {
    let lo1 = s1.a.inf(&s1.b);
    let hi1 = s1.a.sup(&s1.b);
    let lo2 = s2.a.inf(&s2.b);
    let hi2 = s2.a.sup(&s2.b);
    hi1.x >= lo2.x && hi2.x >= lo1.x && hi1.y >= lo2.y && hi2.y >= lo1.y
}
