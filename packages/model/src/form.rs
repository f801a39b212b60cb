//! Form tree nodes and id minting.
//!
//! Ids are minted from a process-global counter, so any two live `Form`
//! values ever produced in this process have distinct ids. That makes the
//! children container duplicate-free *by identity* with no extra bookkeeping:
//! exclusive `Vec` ownership means no node can appear under two parents, and
//! unique ids mean no node can appear twice under one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FORM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique, opaque identifier for a form node.
///
/// Ids are never reused and never mutated in place; every transformation
/// that produces a new node mints a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(u64);

impl FormId {
    /// Mint the next fresh id.
    pub fn fresh() -> Self {
        Self(NEXT_FORM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value, for logs and map keys.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Boundary tag of a form node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    Round,
    Square,
    Angle,
    /// Leaf with a label naming a variable. Atoms have no children.
    Atom,
}

impl Boundary {
    /// Tag name as it appears in canonical signatures and level data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::Round => "round",
            Boundary::Square => "square",
            Boundary::Angle => "angle",
            Boundary::Atom => "atom",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in a boundary-form tree.
///
/// ## Invariants
///
/// - The structure is a finite tree: no cycles, no shared ownership.
/// - `label` is `Some` iff `boundary == Atom`; atoms have no children.
///   Level loading rejects malformed input; transformation code only ever
///   clones existing well-formed nodes.
/// - A plain `clone()` preserves ids (used when carrying untouched siblings
///   across a rewrite); [`Form::deep_clone`] refreshes every id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub boundary: Boundary,
    pub label: Option<String>,
    pub children: Vec<Form>,
}

impl Form {
    /// Build a node with a fresh id owning the given children.
    pub fn new(boundary: Boundary, children: Vec<Form>) -> Self {
        Self {
            id: FormId::fresh(),
            boundary,
            label: None,
            children,
        }
    }

    /// A `round` boundary around the given children.
    pub fn round(children: Vec<Form>) -> Self {
        Self::new(Boundary::Round, children)
    }

    /// A `square` boundary around the given children.
    pub fn square(children: Vec<Form>) -> Self {
        Self::new(Boundary::Square, children)
    }

    /// An `angle` boundary around the given children.
    pub fn angle(children: Vec<Form>) -> Self {
        Self::new(Boundary::Angle, children)
    }

    /// An atom leaf naming a variable. The label must be non-empty; level
    /// loading enforces this for external data.
    pub fn atom(label: impl Into<String>) -> Self {
        Self {
            id: FormId::fresh(),
            boundary: Boundary::Atom,
            label: Some(label.into()),
            children: Vec::new(),
        }
    }

    pub fn is_round(&self) -> bool {
        self.boundary == Boundary::Round
    }

    pub fn is_square(&self) -> bool {
        self.boundary == Boundary::Square
    }

    pub fn is_angle(&self) -> bool {
        self.boundary == Boundary::Angle
    }

    pub fn is_atom(&self) -> bool {
        self.boundary == Boundary::Atom
    }

    /// Rebuild this subtree with entirely fresh ids, preserving boundary,
    /// label, and child order.
    ///
    /// This is the only way transformation code copies a subtree: the clone
    /// is guaranteed to share no id with the original (or with any previous
    /// clone).
    pub fn deep_clone(&self) -> Self {
        let mut out = deep_clone_forest(std::slice::from_ref(self));
        out.pop().unwrap_or_else(|| Form {
            id: FormId::fresh(),
            boundary: self.boundary,
            label: self.label.clone(),
            children: Vec::new(),
        })
    }
}

/// Fresh-id deep clones of a whole forest, preserving root order.
///
/// Iterative post-order (children are rebuilt before their parents), so
/// nesting depth never grows the call stack.
pub fn deep_clone_forest(forms: &[Form]) -> Vec<Form> {
    enum Step<'a> {
        Enter(&'a Form),
        Exit(&'a Form),
    }
    let mut stack: Vec<Step> = forms.iter().rev().map(Step::Enter).collect();
    let mut built: Vec<Vec<Form>> = vec![Vec::with_capacity(forms.len())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node) => {
                stack.push(Step::Exit(node));
                built.push(Vec::with_capacity(node.children.len()));
                stack.extend(node.children.iter().rev().map(Step::Enter));
            }
            Step::Exit(node) => {
                let children = built.pop().unwrap_or_default();
                let clone = Form {
                    id: FormId::fresh(),
                    boundary: node.boundary,
                    label: node.label.clone(),
                    children,
                };
                if let Some(parent) = built.last_mut() {
                    parent.push(clone);
                }
            }
        }
    }
    built.pop().unwrap_or_default()
}
