//! Linear undo/redo over full state snapshots.
//!
//! DESIGN
//! ======
//! The past stack holds snapshots taken immediately before each undoable
//! mutation, bounded to `limit` entries with the oldest dropped first. The
//! future stack holds states undone from and is cleared by any new mutation.
//! Snapshots are whole [`EventState`] clones; events are small enough that
//! structural sharing is not worth its complexity.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::DEFAULT_HISTORY_LIMIT;
use crate::model::EventState;

/// Bounded undo stack plus redo stack.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<EventState>,
    future: Vec<EventState>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create empty history keeping at most `limit` undo steps.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { past: VecDeque::with_capacity(limit.min(64)), future: Vec::new(), limit }
    }

    /// Record the state as it was before a new mutation. Clears redo.
    pub fn record(&mut self, before: EventState) {
        if self.limit == 0 {
            self.future.clear();
            return;
        }
        self.past.push_back(before);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back: stash `current` for redo and return the state to restore.
    pub fn undo(&mut self, current: &EventState) -> Option<EventState> {
        let previous = self.past.pop_back()?;
        self.future.push(current.clone());
        Some(previous)
    }

    /// Step forward: stash `current` for undo and return the state to restore.
    pub fn redo(&mut self, current: &EventState) -> Option<EventState> {
        let next = self.future.pop()?;
        self.past.push_back(current.clone());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        Some(next)
    }

    /// Forget everything (new event loaded or setup re-entered).
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
