//! Dense square marker grids (workspace and C-space share the type).
//!
//! Layout is row-major: row = secondary axis (workspace Y, or `theta1`),
//! column = primary axis (workspace X, or `theta0`).

use std::fmt;

/// Per-cell marker. The discriminants are the diagnostic export values.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Marker {
    #[default]
    Free = 0,
    Occupied = 1,
    Start = 2,
    End = 3,
    Path = 4,
}

impl Marker {
    pub const ALL: [Marker; 5] = [
        Marker::Free,
        Marker::Occupied,
        Marker::Start,
        Marker::End,
        Marker::Path,
    ];

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Start/end/path markers only live for a single planning request.
    #[inline]
    pub fn is_transient(self) -> bool {
        matches!(self, Marker::Start | Marker::End | Marker::Path)
    }
}

impl From<Marker> for u8 {
    fn from(m: Marker) -> u8 {
        m.as_u8()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Grid coordinate. In C-space `x` indexes `theta0` and `y` indexes `theta1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[inline]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dim: usize,
    cells: Vec<Marker>,
}

impl Grid {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![Marker::Free; dim * dim],
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let d = self.dim as i64;
        x >= 0 && y >= 0 && x < d && y < d
    }

    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.y * self.dim + cell.x
    }

    /// Panics if `cell` is out of bounds.
    #[inline]
    pub fn get(&self, cell: Cell) -> Marker {
        self.cells[self.index(cell)]
    }

    /// Bounds-checked lookup with signed coordinates.
    #[inline]
    pub fn get_checked(&self, x: i64, y: i64) -> Option<Marker> {
        if self.contains(x, y) {
            Some(self.get(Cell::new(x as usize, y as usize)))
        } else {
            None
        }
    }

    /// Panics if `cell` is out of bounds.
    #[inline]
    pub fn set(&mut self, cell: Cell, m: Marker) {
        let i = self.index(cell);
        self.cells[i] = m;
    }

    pub fn fill(&mut self, m: Marker) {
        self.cells.fill(m);
    }

    /// Overwrite with `other`'s contents, reusing this grid's allocation.
    pub fn copy_from(&mut self, other: &Grid) {
        self.dim = other.dim;
        self.cells.clone_from(&other.cells);
    }

    /// Reset every transient marker back to `Free`; obstacles survive.
    pub fn clear_transient(&mut self) {
        for c in self.cells.iter_mut() {
            if c.is_transient() {
                *c = Marker::Free;
            }
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Marker] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Marker]> {
        self.cells.chunks(self.dim.max(1))
    }

    pub fn count(&self, m: Marker) -> usize {
        self.cells.iter().filter(|&&c| c == m).count()
    }

    /// Raw export values, row-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|m| m.as_u8()).collect()
    }
}
