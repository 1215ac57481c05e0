//! Undo/redo over a fixed ring of full-canvas snapshots.
//!
//! DESIGN
//! ======
//! `slots` is the ring: `capacity` entries, overwritten cyclically. `stack`
//! lists the slot indices of the linear history the user can walk, oldest
//! first, and `active` points at the entry matching the current canvas.
//!
//! A new snapshot drops every entry after `active` (redo branch), keeps at
//! most `capacity - 1` of the rest, and writes into the slot after the last
//! retained one. When the history is full, that slot belongs to the oldest
//! entry, which the window has just evicted.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::region::Region;

/// One point in the history: a canvas bitmap plus the regions that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry<B> {
    pub canvas: B,
    pub selection: Region,
    pub return_anchor: Region,
}

/// Fixed-capacity linear history with branch truncation.
#[derive(Debug)]
pub struct UndoRing<B> {
    slots: Vec<Option<UndoEntry<B>>>,
    stack: Vec<usize>,
    active: Option<usize>,
}

impl<B> UndoRing<B> {
    /// Create an empty ring. Capacity is floored at two slots, the minimum
    /// that can hold a current state and one step back.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, stack: Vec::with_capacity(capacity), active: None }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of entries in the walkable history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Position of the current entry within the history.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Ring slot indices of the history, oldest first.
    #[must_use]
    pub fn slot_order(&self) -> &[usize] {
        &self.stack
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.active.is_some_and(|a| a > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.active.is_some_and(|a| a + 1 < self.stack.len())
    }

    /// The entry matching the current state, if any snapshot exists.
    #[must_use]
    pub fn current(&self) -> Option<&UndoEntry<B>> {
        let slot = *self.stack.get(self.active?)?;
        self.slots.get(slot)?.as_ref()
    }

    /// Record a new current state, discarding any redo branch.
    pub fn snapshot(&mut self, entry: UndoEntry<B>) {
        let keep = self.active.map_or(0, |a| a + 1);
        self.stack.truncate(keep);

        let next = self.stack.last().map_or(0, |last| (last + 1) % self.slots.len());

        let window = self.slots.len() - 1;
        if self.stack.len() > window {
            self.stack.drain(..self.stack.len() - window);
        }
        self.slots[next] = Some(entry);
        self.stack.push(next);
        self.active = Some(self.stack.len() - 1);
    }

    /// Step back one entry and return it for restoring. `None` at the oldest
    /// entry.
    pub fn undo(&mut self) -> Option<&UndoEntry<B>> {
        let active = self.active.filter(|a| *a > 0)?;
        let slot = self.stack[active - 1];
        self.active = Some(active - 1);
        self.slots.get(slot)?.as_ref()
    }

    /// Step forward one entry and return it for restoring. `None` at the
    /// newest entry.
    pub fn redo(&mut self) -> Option<&UndoEntry<B>> {
        let active = self.active.filter(|a| a + 1 < self.stack.len())?;
        let slot = self.stack[active + 1];
        self.active = Some(active + 1);
        self.slots.get(slot)?.as_ref()
    }
}
