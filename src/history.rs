//! Linear undo/redo over state snapshots.
//!
//! A past/present/future zipper: `present` is always the authoritative
//! state, `commit` pushes the old present into the past and discards
//! any redo branch, `undo`/`redo` shuttle snapshots between the three
//! parts. Depth is unbounded.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    present: T,
    future: VecDeque<T>,
}

impl<T: Clone + PartialEq + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: VecDeque::new(),
        }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Record a new state. Structurally-equal states are ignored so
    /// no-op edits never pollute the history. Any previously undone
    /// states are discarded permanently. Returns whether the commit
    /// took effect.
    pub fn commit(&mut self, state: T) -> bool {
        if state == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, state);
        self.past.push(previous);
        self.future.clear();
        true
    }

    /// Step back one snapshot. A defined no-op when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Step forward one snapshot. A defined no-op when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Drop all history and restore the given state as the only
    /// snapshot. Used when a new image is loaded or the current one
    /// removed.
    pub fn reset(&mut self, initial: T) {
        self.past.clear();
        self.future.clear();
        self.present = initial;
    }
}
