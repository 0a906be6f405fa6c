//! Linear undo/redo history of full snapshots
//!
//! Two bounded stacks. A checkpoint pushes the pre-mutation snapshot onto the
//! undo stack and drops the whole redo lineage; when a stack grows past its
//! capacity the oldest snapshot is evicted.

use std::collections::VecDeque;

use crate::error::{HistoryDirection, LedgerError, LedgerResult};

/// Default number of snapshots kept on each stack
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Undo/redo stacks of snapshots of type `S`
#[derive(Debug, Clone)]
pub struct History<S> {
    /// Oldest snapshot at the front, most recent at the back
    undo: VecDeque<S>,
    redo: VecDeque<S>,
    capacity: usize,
}

impl<S> History<S> {
    /// Create an empty history keeping at most `capacity` snapshots per stack
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo: VecDeque::with_capacity(capacity + 1),
            redo: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record the state as it was before a mutation
    pub fn checkpoint(&mut self, before: S) {
        self.redo.clear();
        Self::push_bounded(&mut self.undo, before, self.capacity);
    }

    /// Step back: returns the snapshot to restore, keeping `current` for redo
    pub fn undo(&mut self, current: S) -> LedgerResult<S> {
        let previous = self
            .undo
            .pop_back()
            .ok_or(LedgerError::EmptyHistory(HistoryDirection::Undo))?;
        Self::push_bounded(&mut self.redo, current, self.capacity);
        Ok(previous)
    }

    /// Step forward again: returns the snapshot to restore, keeping `current` for undo
    pub fn redo(&mut self, current: S) -> LedgerResult<S> {
        let next = self
            .redo
            .pop_back()
            .ok_or(LedgerError::EmptyHistory(HistoryDirection::Redo))?;
        Self::push_bounded(&mut self.undo, current, self.capacity);
        Ok(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of snapshots on the undo stack
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of snapshots on the redo stack
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push_bounded(stack: &mut VecDeque<S>, snapshot: S, capacity: usize) {
        stack.push_back(snapshot);
        while stack.len() > capacity {
            stack.pop_front();
        }
    }
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let mut history: History<u32> = History::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());

        let err = history.undo(0).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyHistory(HistoryDirection::Undo)));
        let err = history.redo(0).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyHistory(HistoryDirection::Redo)));

        // Failed requests leave both stacks untouched
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::new(5);
        history.checkpoint(1);
        history.checkpoint(2);

        // current state is 3
        assert_eq!(history.undo(3).unwrap(), 2);
        assert_eq!(history.undo(2).unwrap(), 1);
        assert!(!history.can_undo());
        assert_eq!(history.redo_depth(), 2);

        assert_eq!(history.redo(1).unwrap(), 2);
        assert_eq!(history.redo(2).unwrap(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut history = History::new(5);
        history.checkpoint(1);
        history.undo(2).unwrap();
        assert!(history.can_redo());

        history.checkpoint(1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(20);
        for state in 0..25 {
            history.checkpoint(state);
        }
        assert_eq!(history.undo_depth(), 20);

        // The five oldest snapshots (0..5) were evicted
        let mut current = 25;
        let mut restored = Vec::new();
        while history.can_undo() {
            current = history.undo(current).unwrap();
            restored.push(current);
        }
        assert_eq!(restored.first(), Some(&24));
        assert_eq!(restored.last(), Some(&5));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut history = History::new(0);
        history.checkpoint("a");
        history.checkpoint("b");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.undo("c").unwrap(), "b");
    }
}
