//! Fixed-capacity node arena with an index free-list.
//!
//! Slots are reserved up front and never reallocated. A freed slot is chained
//! onto the free-list and handed out again by the next `alloc`, so a search
//! that releases dead branches early can explore more cells than the capacity.

use std::ops::{Index, IndexMut};

use crate::spaces::Cell;

/// Validated index into an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Search tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub cell: Cell,
    /// Heuristic distance to the nearest goal.
    pub dist: u32,
    pub parent: Option<NodeId>,
    /// Successor in the frontier list while queued.
    pub next: Option<NodeId>,
    /// Children still allocated; set when the node is expanded.
    pub children: u8,
}

impl Node {
    pub fn root(cell: Cell, dist: u32) -> Self {
        Self {
            cell,
            dist,
            parent: None,
            next: None,
            children: 0,
        }
    }

    pub fn child_of(parent: NodeId, cell: Cell, dist: u32) -> Self {
        Self {
            parent: Some(parent),
            ..Self::root(cell, dist)
        }
    }
}

#[derive(Clone, Debug)]
enum Slot {
    Free(Option<usize>),
    Used(Node),
}

#[derive(Clone, Debug)]
pub struct Arena {
    slots: Vec<Slot>,
    free_head: Option<usize>,
    capacity: usize,
    live: usize,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            capacity,
            live: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Store `node`, or return `None` when every slot is taken.
    pub fn alloc(&mut self, node: Node) -> Option<NodeId> {
        let i = match self.free_head {
            Some(i) => {
                let Slot::Free(next) = self.slots[i] else {
                    unreachable!("free-list points at a used slot");
                };
                self.free_head = next;
                self.slots[i] = Slot::Used(node);
                i
            }
            None if self.slots.len() < self.capacity => {
                self.slots.push(Slot::Used(node));
                self.slots.len() - 1
            }
            None => return None,
        };
        self.live += 1;
        Some(NodeId(i))
    }

    /// Release a node and return its contents. Panics on a stale id.
    pub fn free(&mut self, id: NodeId) -> Node {
        let slot = std::mem::replace(&mut self.slots[id.0], Slot::Free(self.free_head));
        let Slot::Used(node) = slot else {
            panic!("double free of search node {}", id.0);
        };
        self.free_head = Some(id.0);
        self.live -= 1;
        node
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        match self.slots.get(id.0) {
            Some(Slot::Used(n)) => Some(n),
            _ => None,
        }
    }

    /// Release every node; the reserved slots are kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }
}

impl Index<NodeId> for Arena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match &self.slots[id.0] {
            Slot::Used(n) => n,
            Slot::Free(_) => panic!("stale search node {}", id.0),
        }
    }
}

impl IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id.0] {
            Slot::Used(n) => n,
            Slot::Free(_) => panic!("stale search node {}", id.0),
        }
    }
}
