//! # Operation Dispatcher
//!
//! Maps the closed set of user-facing operations onto the rewrite engine
//! and axiom functions.
//!
//! ## Dispatch Semantics
//!
//! 1. **Allow-lists first**: an operation whose axiom category is excluded
//!    by the level, or whose key is excluded by the stricter per-operation
//!    list, is rejected before any target resolution. Sandbox operations
//!    (`AddBoundary`, `AddVariable`) bypass both lists.
//! 2. **Targets by id**: every variant carries ids, never form values;
//!    resolution goes through `locate`.
//! 3. **Documented fallbacks**: clarify on the child of an invertible pair
//!    retargets the pair itself; collect treats a selected square as a hint
//!    toward its enclosing frame.
//! 4. **Structural no-op test**: the result only counts as a change when it
//!    is not structurally equivalent to the input forest. Reference and id
//!    differences do not count.
//!
//! Rejections are `Err` values whose `Display` is the human-readable reason;
//! nothing here panics for well-typed inputs.

use crate::level::{AxiomTag, OperationKey, Rules};
use crate::locate::{locate, locate_one};
use crate::rewrite::{insert_under, rewrite_sibling_group, rewrite_single_target};
use formwork_axioms::{arrangement, inversion, reflection, DisperseOptions, EnfoldVariant};
use formwork_model::{forests_equivalent, Boundary, Form, FormId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-facing operations (intent, not mechanics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Strip an invertible boundary pair at the target.
    Clarify { target_id: FormId },

    /// Wrap the selected siblings (or nothing) in a new boundary pair.
    Enfold {
        target_ids: Vec<FormId>,
        variant: EnfoldVariant,
        parent_id: Option<FormId>,
    },

    /// Split a frame along a square. The frame may be named directly,
    /// implied by the square, or implied by the first content.
    Disperse {
        content_ids: Vec<FormId>,
        square_id: Option<FormId>,
        frame_id: Option<FormId>,
    },

    /// Merge the selected frames into one.
    Collect { target_ids: Vec<FormId> },

    /// Remove one cancelable pair among the selected siblings.
    Cancel { target_ids: Vec<FormId> },

    /// Produce the selected templates' reflection (or a bare placeholder).
    Create {
        parent_id: Option<FormId>,
        template_ids: Vec<FormId>,
    },

    /// Sandbox only: drop in an empty non-atom boundary.
    AddBoundary {
        boundary: Boundary,
        parent_id: Option<FormId>,
    },

    /// Sandbox only: drop in a labeled variable.
    AddVariable {
        label: String,
        parent_id: Option<FormId>,
    },
}

impl Operation {
    /// Axiom category for the level allow-list; `None` for sandbox ops.
    pub fn axiom(&self) -> Option<AxiomTag> {
        match self {
            Operation::Clarify { .. } | Operation::Enfold { .. } => Some(AxiomTag::Inversion),
            Operation::Disperse { .. } | Operation::Collect { .. } => Some(AxiomTag::Arrangement),
            Operation::Cancel { .. } | Operation::Create { .. } => Some(AxiomTag::Reflection),
            Operation::AddBoundary { .. } | Operation::AddVariable { .. } => None,
        }
    }

    /// Operation key for the per-operation allow-list; `None` for sandbox ops.
    pub fn key(&self) -> Option<OperationKey> {
        match self {
            Operation::Clarify { .. } => Some(OperationKey::Clarify),
            Operation::Enfold { .. } => Some(OperationKey::Enfold),
            Operation::Disperse { .. } => Some(OperationKey::Disperse),
            Operation::Collect { .. } => Some(OperationKey::Collect),
            Operation::Cancel { .. } => Some(OperationKey::Cancel),
            Operation::Create { .. } => Some(OperationKey::Create),
            Operation::AddBoundary { .. } | Operation::AddVariable { .. } => None,
        }
    }

    pub fn is_sandbox(&self) -> bool {
        self.key().is_none()
    }
}

/// Why an operation performed nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    #[error("the {0:?} axiom is not allowed in this level")]
    DisallowedAxiom(AxiomTag),

    #[error("the {0:?} operation is not allowed in this level")]
    DisallowedOperation(OperationKey),

    #[error("nothing is selected")]
    NothingSelected,

    #[error("target {0} no longer exists")]
    UnknownTarget(FormId),

    #[error("selection does not form a single sibling group")]
    InvalidSelection,

    #[error("a bare atom boundary cannot be added; use AddVariable")]
    InvalidBoundary,

    #[error("variable label must not be empty")]
    EmptyLabel,
}

/// A dispatched operation's result.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The forest after the operation (fresh nodes along every rewrite path).
    pub forest: Vec<Form>,
    /// False when the result is structurally equivalent to the input, in
    /// which case the caller should not commit it.
    pub changed: bool,
}

/// Run one operation against a forest under the level's allow-lists.
///
/// Pure: the input forest is untouched, so this is equally usable for
/// speculative previews and for committed applications.
pub fn apply_operation(
    forest: &[Form],
    rules: &Rules,
    op: &Operation,
) -> Result<Applied, OperationError> {
    if let Some(axiom) = op.axiom() {
        if !rules.allows_axiom(axiom) {
            tracing::debug!(?axiom, "rejected by axiom allow-list");
            return Err(OperationError::DisallowedAxiom(axiom));
        }
    }
    if let Some(key) = op.key() {
        if !rules.allows_operation(key) {
            tracing::debug!(?key, "rejected by operation allow-list");
            return Err(OperationError::DisallowedOperation(key));
        }
    }

    let next = dispatch(forest, op)?;
    let changed = !forests_equivalent(forest, &next);
    tracing::debug!(changed, roots = next.len(), "operation dispatched");
    Ok(Applied { forest: next, changed })
}

fn dispatch(forest: &[Form], op: &Operation) -> Result<Vec<Form>, OperationError> {
    match op {
        Operation::Clarify { target_id } => {
            let located =
                locate_one(forest, *target_id).ok_or(OperationError::UnknownTarget(*target_id))?;
            let mut effective = *target_id;
            if !inversion::is_clarify_applicable(located.form) {
                // Selecting inside an invertible pair means the pair itself.
                if let Some(parent) = located.parent {
                    if inversion::is_clarify_applicable(parent) {
                        effective = parent.id;
                    }
                }
            }
            rewrite_single_target(forest, effective, inversion::clarify)
                .ok_or(OperationError::UnknownTarget(*target_id))
        }

        Operation::Enfold {
            target_ids,
            variant,
            parent_id,
        } => {
            if target_ids.is_empty() {
                ensure_insert_parent(forest, *parent_id)?;
                let pair = inversion::enfold(*variant, &[]);
                return insert_under(forest, *parent_id, pair)
                    .ok_or_else(|| stale_parent(*parent_id));
            }
            ensure_known(forest, target_ids)?;
            let variant = *variant;
            rewrite_sibling_group(forest, target_ids, move |group| {
                let owned: Vec<Form> = group.iter().map(|f| (*f).clone()).collect();
                vec![inversion::enfold(variant, &owned)]
            })
            .ok_or(OperationError::InvalidSelection)
        }

        Operation::Disperse {
            content_ids,
            square_id,
            frame_id,
        } => {
            let (frame, square) = resolve_frame(forest, content_ids, *square_id, *frame_id)?;
            let options = DisperseOptions {
                square_id: square,
                content_ids: if content_ids.is_empty() {
                    None
                } else {
                    Some(content_ids.clone())
                },
            };
            rewrite_single_target(forest, frame, |form| arrangement::disperse(form, &options))
                .ok_or(OperationError::UnknownTarget(frame))
        }

        Operation::Collect { target_ids } => {
            if target_ids.is_empty() {
                return Err(OperationError::NothingSelected);
            }
            let found = locate(forest, target_ids);
            let mut effective: Vec<FormId> = Vec::with_capacity(target_ids.len());
            for id in target_ids {
                let located = found
                    .get(id)
                    .ok_or(OperationError::UnknownTarget(*id))?;
                // A selected square is a hint toward its enclosing frame.
                let mapped = match located.parent {
                    Some(parent) if located.form.is_square() && arrangement::is_frame(parent) => {
                        parent.id
                    }
                    _ => *id,
                };
                if !effective.contains(&mapped) {
                    effective.push(mapped);
                }
            }
            rewrite_sibling_group(forest, &effective, |group| {
                let owned: Vec<Form> = group.iter().map(|f| (*f).clone()).collect();
                arrangement::collect(&owned)
            })
            .ok_or(OperationError::InvalidSelection)
        }

        Operation::Cancel { target_ids } => {
            if target_ids.is_empty() {
                return Err(OperationError::NothingSelected);
            }
            ensure_known(forest, target_ids)?;
            rewrite_sibling_group(forest, target_ids, |group| {
                let owned: Vec<Form> = group.iter().map(|f| (*f).clone()).collect();
                reflection::cancel(&owned)
            })
            .ok_or(OperationError::InvalidSelection)
        }

        Operation::Create {
            parent_id,
            template_ids,
        } => {
            if template_ids.is_empty() {
                ensure_insert_parent(forest, *parent_id)?;
                let placeholder = reflection::create(&[])
                    .pop()
                    .unwrap_or_else(|| Form::angle(Vec::new()));
                return insert_under(forest, *parent_id, placeholder)
                    .ok_or_else(|| stale_parent(*parent_id));
            }
            ensure_known(forest, template_ids)?;
            rewrite_sibling_group(forest, template_ids, |group| {
                let owned: Vec<Form> = group.iter().map(|f| (*f).clone()).collect();
                reflection::create(&owned)
            })
            .ok_or(OperationError::InvalidSelection)
        }

        Operation::AddBoundary {
            boundary,
            parent_id,
        } => {
            if *boundary == Boundary::Atom {
                return Err(OperationError::InvalidBoundary);
            }
            ensure_insert_parent(forest, *parent_id)?;
            insert_under(forest, *parent_id, Form::new(*boundary, Vec::new()))
                .ok_or_else(|| stale_parent(*parent_id))
        }

        Operation::AddVariable { label, parent_id } => {
            if label.is_empty() {
                return Err(OperationError::EmptyLabel);
            }
            ensure_insert_parent(forest, *parent_id)?;
            insert_under(forest, *parent_id, Form::atom(label.clone()))
                .ok_or_else(|| stale_parent(*parent_id))
        }
    }
}

/// Frame resolution for Disperse: explicit frame, else the selected square's
/// parent, else the first content's grandparent. Also reports which square
/// the selection implies, so the axiom does not fall back to the frame's
/// first square when the player picked contents of another.
fn resolve_frame(
    forest: &[Form],
    content_ids: &[FormId],
    square_id: Option<FormId>,
    frame_id: Option<FormId>,
) -> Result<(FormId, Option<FormId>), OperationError> {
    if let Some(id) = frame_id {
        locate_one(forest, id).ok_or(OperationError::UnknownTarget(id))?;
        return Ok((id, square_id));
    }
    if let Some(id) = square_id {
        let square = locate_one(forest, id).ok_or(OperationError::UnknownTarget(id))?;
        let frame = square
            .parent
            .map(|p| p.id)
            .ok_or(OperationError::InvalidSelection)?;
        return Ok((frame, Some(id)));
    }
    let first = content_ids
        .first()
        .ok_or(OperationError::NothingSelected)?;
    let content = locate_one(forest, *first).ok_or(OperationError::UnknownTarget(*first))?;
    let square = content.parent.ok_or(OperationError::InvalidSelection)?;
    let square_loc = locate_one(forest, square.id).ok_or(OperationError::InvalidSelection)?;
    let frame = square_loc
        .parent
        .map(|p| p.id)
        .ok_or(OperationError::InvalidSelection)?;
    Ok((frame, Some(square.id)))
}

/// Insertion parents must exist and must not be atoms: atoms are leaves
/// and never carry children.
fn ensure_insert_parent(
    forest: &[Form],
    parent_id: Option<FormId>,
) -> Result<(), OperationError> {
    if let Some(id) = parent_id {
        let located = locate_one(forest, id).ok_or(OperationError::UnknownTarget(id))?;
        if located.form.is_atom() {
            return Err(OperationError::InvalidSelection);
        }
    }
    Ok(())
}

fn ensure_known(forest: &[Form], ids: &[FormId]) -> Result<(), OperationError> {
    let found = locate(forest, ids);
    for id in ids {
        if !found.contains_key(id) {
            return Err(OperationError::UnknownTarget(*id));
        }
    }
    Ok(())
}

fn stale_parent(parent_id: Option<FormId>) -> OperationError {
    match parent_id {
        Some(id) => OperationError::UnknownTarget(id),
        None => OperationError::InvalidSelection,
    }
}
