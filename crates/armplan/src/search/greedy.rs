//! Greedy best-first search over an 8-connected grid.

use fixedbitset::FixedBitSet;
use tracing::{debug, info, warn};

use super::arena::{Arena, Node, NodeId};
use super::frontier::Frontier;
use crate::cfg::ArmCfg;
use crate::error::PlanningError;
use crate::spaces::{Cell, Grid, Marker};

/// Expansion order: orthogonal neighbours first, then diagonals.
pub const NEIGHBOURS: [(i64, i64); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
];

/// Ceiling of the Euclidean distance from `cell` to the nearest goal.
///
/// Admissible only in open space; with obstacles the search is plainly greedy.
pub fn heuristic(cell: Cell, goals: &[Cell]) -> u32 {
    goals
        .iter()
        .map(|g| {
            let dx = cell.x as f64 - g.x as f64;
            let dy = cell.y as f64 - g.y as f64;
            (dx * dx + dy * dy).sqrt().ceil() as u32
        })
        .min()
        .unwrap_or(u32::MAX)
}

/// Counters for the last [`GreedySearch::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the frontier.
    pub expanded: usize,
    /// Nodes allocated, root included.
    pub allocated: usize,
    /// Nodes released mid-search because their whole subtree died out.
    pub released_early: usize,
    /// Highest simultaneous arena occupancy.
    pub peak_live: usize,
}

/// Reusable search state: node arena, visited bitmap and frontier.
///
/// Every run starts from an empty arena and leaves it empty, whatever the
/// outcome.
#[derive(Clone, Debug)]
pub struct GreedySearch {
    arena: Arena,
    visited: FixedBitSet,
    frontier: Frontier,
    max_steps: usize,
    stats: SearchStats,
}

impl GreedySearch {
    pub fn new(arena_nodes: usize, max_steps: usize) -> Self {
        Self {
            arena: Arena::with_capacity(arena_nodes),
            visited: FixedBitSet::new(),
            frontier: Frontier::new(),
            max_steps,
            stats: SearchStats::default(),
        }
    }

    pub fn for_cfg(cfg: &ArmCfg) -> Self {
        let mut s = Self::new(cfg.arena_nodes, cfg.max_steps);
        s.visited.grow(cfg.cspace_dim() * cfg.cspace_dim());
        s
    }

    /// Nodes currently allocated. Zero between runs.
    #[inline]
    pub fn live_nodes(&self) -> usize {
        self.arena.live()
    }

    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search from `start` until a cell marked `End` is dequeued.
    ///
    /// `goals` only steers the heuristic; termination is decided by the grid
    /// markers. Returns the cells from `start` to the goal, inclusive.
    pub fn run(
        &mut self,
        grid: &Grid,
        start: Cell,
        goals: &[Cell],
    ) -> Result<Vec<Cell>, PlanningError> {
        self.stats = SearchStats::default();
        let out = self.search(grid, start, goals);
        self.frontier.clear();
        self.arena.clear();
        match &out {
            Ok(path) => info!(
                steps = path.len(),
                expanded = self.stats.expanded,
                peak_live = self.stats.peak_live,
                "path found"
            ),
            Err(e) => warn!(
                error = %e,
                expanded = self.stats.expanded,
                "search failed"
            ),
        }
        out
    }

    fn search(
        &mut self,
        grid: &Grid,
        start: Cell,
        goals: &[Cell],
    ) -> Result<Vec<Cell>, PlanningError> {
        if goals.is_empty() {
            return Err(PlanningError::invalid("search needs at least one goal"));
        }
        if !grid.contains(start.x as i64, start.y as i64) {
            return Err(PlanningError::invalid("search start lies outside the grid"));
        }
        self.visited.grow(grid.len());
        self.visited.clear();
        self.visited.insert(grid.index(start));

        let root = self.alloc(Node::root(start, heuristic(start, goals)))?;
        self.frontier.insert(&mut self.arena, root);

        while let Some(cur) = self.frontier.pop(&mut self.arena) {
            self.stats.expanded += 1;
            let cell = self.arena[cur].cell;
            if grid.get(cell) == Marker::End {
                return self.reconstruct(cur);
            }

            let mut spawned = 0u8;
            for (dx, dy) in NEIGHBOURS {
                let (nx, ny) = (cell.x as i64 + dx, cell.y as i64 + dy);
                match grid.get_checked(nx, ny) {
                    None | Some(Marker::Occupied) => continue,
                    Some(_) => {}
                }
                let n = Cell::new(nx as usize, ny as usize);
                let bit = grid.index(n);
                if self.visited.contains(bit) {
                    continue;
                }
                self.visited.insert(bit);
                let id = self.alloc(Node::child_of(cur, n, heuristic(n, goals)))?;
                self.frontier.insert(&mut self.arena, id);
                spawned += 1;
            }

            self.arena[cur].children = spawned;
            if spawned == 0 {
                self.release_dead_branch(cur);
            }
        }
        Err(PlanningError::NoPathFound)
    }

    fn alloc(&mut self, node: Node) -> Result<NodeId, PlanningError> {
        let Some(id) = self.arena.alloc(node) else {
            warn!(capacity = self.arena.capacity(), "search arena exhausted");
            return Err(PlanningError::NoPathFound);
        };
        self.stats.allocated += 1;
        self.stats.peak_live = self.stats.peak_live.max(self.arena.live());
        Ok(id)
    }

    /// Free a dequeued node without live children, then every ancestor left
    /// childless by that.
    fn release_dead_branch(&mut self, mut id: NodeId) {
        loop {
            let node = self.arena.free(id);
            self.stats.released_early += 1;
            let Some(parent) = node.parent else {
                return;
            };
            let p = &mut self.arena[parent];
            p.children -= 1;
            if p.children > 0 {
                return;
            }
            id = parent;
        }
    }

    /// Walk parents back from the goal into a forward-ordered cell list.
    fn reconstruct(&self, goal: NodeId) -> Result<Vec<Cell>, PlanningError> {
        let mut path = Vec::with_capacity(self.max_steps);
        let mut cur = Some(goal);
        while let Some(id) = cur {
            if path.len() == self.max_steps {
                return Err(PlanningError::PathTooLong {
                    limit: self.max_steps,
                });
            }
            let node = &self.arena[id];
            path.push(node.cell);
            cur = node.parent;
        }
        path.reverse();
        debug!(steps = path.len(), "path reconstructed");
        Ok(path)
    }
}
