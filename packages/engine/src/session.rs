//! # Puzzle Session
//!
//! The single owner of mutable puzzle state: current forest, goal,
//! allow-lists, selection, and history. Everything below it is pure, so a
//! host can freely run speculative previews through the same dispatch path
//! without touching the committed state.
//!
//! Operations are applied strictly one at a time in the order requested;
//! only the commit step here may push to or pop from the history stacks.

use crate::history::History;
use crate::level::{Level, LoadError, OperationKey, Rules};
use crate::locate::locate;
use crate::operations::{apply_operation, Operation, OperationError};
use formwork_model::{forests_equivalent, walk_forest, Form, FormId, LabelCollector};

/// One loaded level being played.
#[derive(Debug)]
pub struct Session {
    forest: Vec<Form>,
    goal: Vec<Form>,
    rules: Rules,
    selection: Vec<FormId>,
    history: History,
}

impl Session {
    /// Materialize a level into a fresh session.
    pub fn load(level: &Level) -> Result<Self, LoadError> {
        Ok(Self {
            forest: level.materialize_start()?,
            goal: level.materialize_goal()?,
            rules: level.rules(),
            selection: Vec::new(),
            history: History::new(),
        })
    }

    /// An unrestricted session over an existing forest with no goal
    /// (sandbox play).
    pub fn sandbox(forest: Vec<Form>) -> Self {
        Self {
            forest,
            goal: Vec::new(),
            rules: Rules::permissive(),
            selection: Vec::new(),
            history: History::new(),
        }
    }

    pub fn forest(&self) -> &[Form] {
        &self.forest
    }

    pub fn goal(&self) -> &[Form] {
        &self.goal
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Apply an operation and commit it if it changed anything.
    ///
    /// Returns `Ok(true)` when the forest changed and the pre-state was
    /// pushed onto the undo stack, `Ok(false)` when the result was
    /// structurally equivalent to the input (nothing committed), and `Err`
    /// with the rejection reason otherwise. Rejections leave every piece of
    /// state untouched.
    pub fn apply(&mut self, op: &Operation) -> Result<bool, OperationError> {
        let applied = apply_operation(&self.forest, &self.rules, op)?;
        if !applied.changed {
            return Ok(false);
        }
        let previous = std::mem::replace(&mut self.forest, applied.forest);
        self.history.record(previous);
        self.selection.clear();
        tracing::debug!(roots = self.forest.len(), solved = self.is_solved(), "committed");
        Ok(true)
    }

    /// Run an operation without committing: same dispatch, same rejection
    /// reasons, no history, no state change.
    pub fn preview(&self, op: &Operation) -> Result<Vec<Form>, OperationError> {
        Ok(apply_operation(&self.forest, &self.rules, op)?.forest)
    }

    /// Whether the dispatcher would even consider this operation under the
    /// level's allow-lists (for graying out controls).
    pub fn is_operation_allowed(&self, op: &Operation) -> bool {
        match (op.axiom(), op.key()) {
            (Some(axiom), Some(key)) => {
                self.rules.allows_axiom(axiom) && self.rules.allows_operation(key)
            }
            _ => true, // sandbox operations bypass the allow-lists
        }
    }

    /// Whether an operation key passes the per-operation allow-list.
    pub fn is_key_allowed(&self, key: OperationKey) -> bool {
        self.rules.allows_operation(key)
    }

    /// Step back one committed operation. Selection is cleared: the restored
    /// forest carries fresh ids.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.forest) {
            Some(restored) => {
                self.forest = restored;
                self.selection.clear();
                true
            }
            None => false,
        }
    }

    /// Step forward one undone operation.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.forest) {
            Some(restored) => {
                self.forest = restored;
                self.selection.clear();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Win signal: the current forest is structurally equivalent to the
    /// goal forest, root order ignored.
    pub fn is_solved(&self) -> bool {
        forests_equivalent(&self.forest, &self.goal)
    }

    pub fn selection(&self) -> &[FormId] {
        &self.selection
    }

    /// Replace the selection, silently dropping ids that no longer resolve
    /// against the live forest.
    pub fn set_selection(&mut self, ids: Vec<FormId>) {
        let found = locate(&self.forest, &ids);
        self.selection = ids.into_iter().filter(|id| found.contains_key(id)).collect();
    }

    /// Toggle one id in the selection. Returns whether it is now selected;
    /// unknown ids are ignored and report `false`.
    pub fn toggle_selected(&mut self, id: FormId) -> bool {
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
            return false;
        }
        if locate(&self.forest, &[id]).contains_key(&id) {
            self.selection.push(id);
            return true;
        }
        false
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Distinct atom labels present in the current forest, sorted (sandbox
    /// variable palette).
    pub fn variables(&self) -> Vec<String> {
        let mut collector = LabelCollector::default();
        walk_forest(&mut collector, &self.forest);
        collector.labels.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{AxiomTag, RawForm};
    use formwork_model::Boundary;

    fn clarify_level() -> Level {
        // round(square(atom a)) → atom a, inversion only.
        Level {
            start: vec![RawForm {
                boundary: Boundary::Round,
                label: None,
                children: vec![RawForm {
                    boundary: Boundary::Square,
                    label: None,
                    children: vec![RawForm {
                        boundary: Boundary::Atom,
                        label: Some("a".to_string()),
                        children: vec![],
                    }],
                }],
            }],
            goal: vec![RawForm {
                boundary: Boundary::Atom,
                label: Some("a".to_string()),
                children: vec![],
            }],
            allowed_axioms: Some(vec![AxiomTag::Inversion]),
            allowed_operations: None,
        }
    }

    #[test]
    fn test_clarify_level_to_win() {
        let mut session = Session::load(&clarify_level()).unwrap();
        assert!(!session.is_solved());

        let root_id = session.forest()[0].id;
        let changed = session
            .apply(&Operation::Clarify { target_id: root_id })
            .unwrap();
        assert!(changed);
        assert!(session.is_solved());
        assert!(session.can_undo());
    }

    #[test]
    fn test_undo_redo_cycle_preserves_structure() {
        let mut session = Session::load(&clarify_level()).unwrap();
        let root_id = session.forest()[0].id;
        session.apply(&Operation::Clarify { target_id: root_id }).unwrap();

        assert!(session.undo());
        assert!(!session.is_solved());
        assert_eq!(
            formwork_model::canonical_signature(&session.forest()[0]),
            "round:[square:[atom:a[]]]"
        );

        assert!(session.redo());
        assert!(session.is_solved());
        assert!(!session.redo());
    }

    #[test]
    fn test_no_change_is_not_committed() {
        let mut session = Session::sandbox(vec![Form::round(vec![Form::atom("a")])]);
        let root_id = session.forest()[0].id;
        let changed = session
            .apply(&Operation::Clarify { target_id: root_id })
            .unwrap();
        assert!(!changed);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut session = Session::load(&clarify_level()).unwrap();
        let root_id = session.forest()[0].id;
        let err = session.apply(&Operation::Cancel {
            target_ids: vec![root_id],
        });
        assert!(err.is_err());
        assert!(!session.can_undo());
        assert_eq!(session.forest().len(), 1);
    }

    #[test]
    fn test_preview_does_not_commit() {
        let session = Session::load(&clarify_level()).unwrap();
        let root_id = session.forest()[0].id;
        let previewed = session
            .preview(&Operation::Clarify { target_id: root_id })
            .unwrap();
        assert_eq!(
            formwork_model::canonical_signature(&previewed[0]),
            "atom:a[]"
        );
        assert_eq!(
            formwork_model::canonical_signature(&session.forest()[0]),
            "round:[square:[atom:a[]]]"
        );
    }

    #[test]
    fn test_selection_guards() {
        let mut session = Session::sandbox(vec![Form::atom("a")]);
        let live = session.forest()[0].id;
        let stale = Form::atom("gone").id;

        session.set_selection(vec![live, stale]);
        assert_eq!(session.selection(), &[live]);

        assert!(!session.toggle_selected(stale));
        assert!(!session.toggle_selected(live));
        assert!(session.selection().is_empty());
        assert!(session.toggle_selected(live));
    }

    #[test]
    fn test_selection_cleared_on_commit() {
        let mut session = Session::load(&clarify_level()).unwrap();
        let root_id = session.forest()[0].id;
        session.set_selection(vec![root_id]);
        session.apply(&Operation::Clarify { target_id: root_id }).unwrap();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_variables_lists_labels() {
        let session = Session::sandbox(vec![
            Form::round(vec![Form::atom("y"), Form::atom("x")]),
            Form::atom("x"),
        ]);
        assert_eq!(session.variables(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_allow_list_queries() {
        let session = Session::load(&clarify_level()).unwrap();
        assert!(session.is_operation_allowed(&Operation::Clarify {
            target_id: FormId::fresh(),
        }));
        assert!(!session.is_operation_allowed(&Operation::Cancel { target_ids: vec![] }));
        assert!(session.is_operation_allowed(&Operation::AddVariable {
            label: "v".to_string(),
            parent_id: None,
        }));
    }
}
