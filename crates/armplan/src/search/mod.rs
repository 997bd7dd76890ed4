//! Memory-bounded greedy best-first pathfinder over the C-space grid.
//!
//! Purpose
//! - Find *a* step sequence from the start cell to any cell marked `End`,
//!   moving between 8-connected neighbours that are in bounds and not
//!   `Occupied`.
//!
//! Why this design
//! - Nodes live in a fixed-capacity arena and refer to each other by index,
//!   so parent links never dangle and the footprint is bounded up front.
//! - The frontier is a sorted singly linked list threaded through the arena;
//!   each reachable cell is queued at most once thanks to a packed visited bitmap.
//! - Branches that die out (a dequeued node with no surviving children) are
//!   released immediately, which keeps long dead-end mazes within the arena.
//! - The heuristic is the distance to the nearest candidate goal; the search
//!   is greedy, not optimal.

mod arena;
mod frontier;
mod greedy;

pub use arena::{Arena, Node, NodeId};
pub use frontier::Frontier;
pub use greedy::{heuristic, GreedySearch, SearchStats, NEIGHBOURS};

#[cfg(test)]
mod tests;
