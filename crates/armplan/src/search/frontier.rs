//! Frontier: singly linked list of queued nodes, threaded through the arena
//! and kept sorted ascending by heuristic distance.
//!
//! Insertion walks past every entry with `dist <= new.dist`, so equal
//! distances are served first-in first-out.

use super::arena::{Arena, NodeId};

#[derive(Clone, Debug, Default)]
pub struct Frontier {
    head: Option<NodeId>,
    len: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Sorted insert, O(len).
    pub fn insert(&mut self, arena: &mut Arena, id: NodeId) {
        let dist = arena[id].dist;
        self.len += 1;
        let Some(head) = self.head else {
            arena[id].next = None;
            self.head = Some(id);
            return;
        };
        if arena[head].dist > dist {
            arena[id].next = Some(head);
            self.head = Some(id);
            return;
        }
        let mut cur = head;
        loop {
            match arena[cur].next {
                Some(n) if arena[n].dist <= dist => cur = n,
                after => {
                    arena[id].next = after;
                    arena[cur].next = Some(id);
                    return;
                }
            }
        }
    }

    /// Unlink and return the head (smallest distance).
    pub fn pop(&mut self, arena: &mut Arena) -> Option<NodeId> {
        let head = self.head?;
        self.head = arena[head].next.take();
        self.len -= 1;
        Some(head)
    }

    /// Forget every queued entry. The nodes themselves belong to the arena.
    pub fn clear(&mut self) {
        self.head = None;
        self.len = 0;
    }
}
