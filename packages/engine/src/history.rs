//! Undo/redo snapshot stacks.
//!
//! Each committed operation records a snapshot of the pre-operation forest.
//! Undo restores the latest snapshot and parks the current forest on the
//! redo stack; a new commit clears redo. Restored forests are fresh-id deep
//! clones: restoring counts as producing new forms, and the stored
//! snapshots stay inert.

use formwork_model::{deep_clone_forest, Form};

const DEFAULT_MAX_LEVELS: usize = 100;

/// Snapshot-based undo/redo history over a forest.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Vec<Form>>,
    redo_stack: Vec<Vec<Form>>,
    /// Maximum number of undo levels (0 = unlimited).
    max_levels: usize,
}

impl History {
    /// History with the default depth cap (100).
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    /// History with a custom depth cap.
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the pre-operation forest of a committed change.
    /// Clears the redo stack: a new action invalidates the redone future.
    pub fn record(&mut self, snapshot: Vec<Form>) {
        self.undo_stack.push(snapshot);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Step back once. Returns the restored forest, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &[Form]) -> Option<Vec<Form>> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current.to_vec());
        Some(deep_clone_forest(&snapshot))
    }

    /// Step forward once after an undo.
    pub fn redo(&mut self, current: &[Form]) -> Option<Vec<Form>> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current.to_vec());
        Some(deep_clone_forest(&snapshot))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history (level reload).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_model::forests_equivalent;

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo(&[]).is_none());
        assert!(history.redo(&[]).is_none());
    }

    #[test]
    fn test_undo_restores_equivalent_forest_with_fresh_ids() {
        let before = vec![Form::round(vec![Form::atom("a")])];
        let after = vec![Form::atom("a")];

        let mut history = History::new();
        history.record(before.clone());

        let restored = history.undo(&after).expect("one level recorded");
        assert!(forests_equivalent(&restored, &before));
        assert_ne!(restored[0].id, before[0].id);
        assert_eq!(history.redo_levels(), 1);
    }

    #[test]
    fn test_redo_round_trip() {
        let before = vec![Form::atom("a")];
        let after = vec![Form::atom("b")];

        let mut history = History::new();
        history.record(before.clone());
        let undone = history.undo(&after).expect("recorded");
        let redone = history.redo(&undone).expect("undone");

        assert!(forests_equivalent(&redone, &after));
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record(vec![Form::atom("a")]);
        history.undo(&[]).expect("recorded");
        assert_eq!(history.redo_levels(), 1);

        history.record(vec![Form::atom("b")]);
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut history = History::with_max_levels(2);
        for label in ["a", "b", "c"] {
            history.record(vec![Form::atom(label)]);
        }
        assert_eq!(history.undo_levels(), 2);

        // Oldest snapshot was dropped; the two newest remain.
        let restored = history.undo(&[]).expect("levels remain");
        assert_eq!(restored[0].label.as_deref(), Some("c"));
    }
}
