//! Handle-linked list that holds a shard's clock order.
//!
//! Nodes are owned by a [`SlotArena`] and point at each other through
//! [`SlotId`]s instead of references. The list is the sole owner of its
//! values; callers keep handles, which stay valid until the node is removed.
//!
//! ```text
//!   SlotArena<Node<T>>                      clock order
//!   ┌────┬───────────────────────┐
//!   │ #0 │ B  prev:#2  next:#1   │           head           tail
//!   │ #1 │ C  prev:#0  next:-    │            │              │
//!   │ #2 │ A  prev:-   next:#0   │            ▼              ▼
//!   │ #3 │ (free)                │           #2 ──► #0 ──► #1
//!   └────┴───────────────────────┘            A      B      C
//! ```
//!
//! [`rotate_front`](IntrusiveList::rotate_front) relinks the head behind the
//! tail without touching its value, which is the move a clock scan makes when
//! it gives an entry its second chance.
use std::collections::TryReserveError;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Links {
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    links: Links,
}

/// Doubly linked list over arena slots.
#[derive(Debug)]
pub struct IntrusiveList<T> {
    nodes: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Makes sure the next `additional` pushes do not allocate.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.nodes.try_reserve(additional)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes that fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` while `id` names a linked node.
    pub fn contains(&self, id: SlotId) -> bool {
        self.nodes.contains(id)
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn front(&self) -> Option<&T> {
        self.get(self.head?)
    }

    pub fn back(&self) -> Option<&T> {
        self.get(self.tail?)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|node| &mut node.value)
    }

    /// Values from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.iter_entries().map(|(_, value)| value)
    }

    /// `(handle, value)` pairs from head to tail.
    pub fn iter_entries(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Appends `value` behind the tail and returns its handle.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.nodes.insert(Node {
            value,
            links: Links::default(),
        });
        self.link_tail(id);
        id
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.remove(self.head?)
    }

    /// Unlinks `id` and returns its value; `None` if the handle is stale.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.unlink(id)?;
        self.nodes.remove(id).map(|node| node.value)
    }

    /// Relinks `id` behind the tail. Returns `false` for a stale handle.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if self.tail == Some(id) {
            return true;
        }
        if self.unlink(id).is_none() {
            return false;
        }
        self.link_tail(id);
        true
    }

    /// Moves the head behind the tail and returns the new head.
    pub fn rotate_front(&mut self) -> Option<SlotId> {
        let head = self.head?;
        self.move_to_back(head);
        self.head
    }

    /// Drops every node; handles issued before are stale afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    fn links_mut(&mut self, id: SlotId) -> Option<&mut Links> {
        self.nodes.get_mut(id).map(|node| &mut node.links)
    }

    fn unlink(&mut self, id: SlotId) -> Option<()> {
        let Links { prev, next } = std::mem::take(self.links_mut(id)?);

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }
        Some(())
    }

    fn link_tail(&mut self, id: SlotId) {
        let old_tail = self.tail;
        if let Some(links) = self.links_mut(id) {
            *links = Links {
                prev: old_tail,
                next: None,
            };
        }
        match old_tail {
            Some(t) => self.set_next(t, Some(id)),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    fn set_next(&mut self, id: SlotId, next: Option<SlotId>) {
        if let Some(links) = self.links_mut(id) {
            links.next = next;
        }
    }

    fn set_prev(&mut self, id: SlotId, prev: Option<SlotId>) {
        if let Some(links) = self.links_mut(id) {
            links.prev = prev;
        }
    }

    /// Walks head to tail and checks every back link, the tail pointer and
    /// that the walk covers exactly the live nodes.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.is_empty() != (self.head.is_none() && self.tail.is_none()) {
            return Err(InvariantError::new(
                "head/tail do not agree with node count",
            ));
        }

        let mut walked = 0usize;
        let mut expected_prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| InvariantError::new("order links to a freed slot"))?;
            if node.links.prev != expected_prev {
                return Err(InvariantError::new(format!(
                    "slot {} links back to {:?}, expected {:?}",
                    id.index(),
                    node.links.prev,
                    expected_prev
                )));
            }
            walked += 1;
            if walked > self.len() {
                return Err(InvariantError::new("order links form a cycle"));
            }
            expected_prev = Some(id);
            cursor = node.links.next;
        }

        if expected_prev != self.tail {
            return Err(InvariantError::new("walk did not end at the tail"));
        }
        if walked != self.len() {
            return Err(InvariantError::new(format!(
                "walked {walked} nodes but {} are live",
                self.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("intrusive list invariant violated: {err}");
        }
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Head-to-tail iterator over `(SlotId, &T)`.
pub struct Iter<'a, T> {
    nodes: &'a SlotArena<Node<T>>,
    cursor: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.nodes.get(id)?;
        self.cursor = node.links.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((id, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
