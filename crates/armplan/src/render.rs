//! Text dump of the annotated grids.
//!
//! Each grid is written between a pair of identical marker lines, one digit
//! per cell and one row per line (rows follow `theta1` / workspace Y). The
//! dump ends with a `===DONE===` line, which plotting tools use to detect a
//! complete file.

use std::fmt;
use std::io::{self, Write};

use crate::spaces::{Grid, Marker};

pub const CSPACE_MARKER: &str = "===CSPACE===";
pub const WSPACE_MARKER: &str = "===WSPACE===";
pub const DONE_MARKER: &str = "===DONE===";

/// Write one grid enclosed by `marker` lines.
pub fn write_grid<W: Write>(out: &mut W, marker: &str, grid: &Grid) -> io::Result<()> {
    writeln!(out, "{marker}")?;
    let mut line = Vec::with_capacity(grid.dim() + 1);
    for row in grid.rows() {
        line.clear();
        line.extend(row.iter().map(|m| b'0' + m.as_u8()));
        line.push(b'\n');
        out.write_all(&line)?;
    }
    writeln!(out, "{marker}")
}

/// Write the C-space, then the workspace, then the done marker.
pub fn write_spaces<W: Write>(out: &mut W, cspace: &Grid, wspace: &Grid) -> io::Result<()> {
    write_grid(out, CSPACE_MARKER, cspace)?;
    write_grid(out, WSPACE_MARKER, wspace)?;
    writeln!(out, "{DONE_MARKER}")
}

/// [`write_spaces`] into a string.
pub fn render_spaces(cspace: &Grid, wspace: &Grid) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = write_spaces(&mut buf, cspace, wspace);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Per-marker cell counts of one grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerCounts {
    pub free: usize,
    pub occupied: usize,
    pub start: usize,
    pub end: usize,
    pub path: usize,
}

impl MarkerCounts {
    pub fn of(grid: &Grid) -> Self {
        let mut c = Self::default();
        for m in grid.cells() {
            match m {
                Marker::Free => c.free += 1,
                Marker::Occupied => c.occupied += 1,
                Marker::Start => c.start += 1,
                Marker::End => c.end += 1,
                Marker::Path => c.path += 1,
            }
        }
        c
    }
}

impl fmt::Display for MarkerCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "free={} occupied={} start={} end={} path={}",
            self.free, self.occupied, self.start, self.end, self.path
        )
    }
}
