//! Level definitions and load-time materialization.
//!
//! A level arrives as plain data: raw start and goal trees plus optional
//! allow-lists restricting which axioms or operations the player may use.
//! Raw trees are materialized into live [`Form`]s with fresh ids on load;
//! malformed data (an atom with children, a label on a non-atom) is a
//! contract violation rejected here rather than tolerated downstream.

use formwork_model::{Boundary, Form};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axiom categories for level allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxiomTag {
    Inversion,
    Arrangement,
    Reflection,
}

/// Per-operation keys for stricter allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKey {
    Clarify,
    Enfold,
    Disperse,
    Collect,
    Cancel,
    Create,
}

/// A form tree as level data: no ids yet, children optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForm {
    pub boundary: Boundary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawForm>,
}

impl RawForm {
    /// Materialize into a live form with fresh ids, validating the atom
    /// invariants on the way down.
    pub fn materialize(&self) -> Result<Form, LoadError> {
        match self.boundary {
            Boundary::Atom => {
                let label = self.label.as_deref().ok_or(LoadError::MissingLabel)?;
                if label.is_empty() {
                    return Err(LoadError::EmptyLabel);
                }
                if !self.children.is_empty() {
                    return Err(LoadError::AtomWithChildren(label.to_string()));
                }
                Ok(Form::atom(label))
            }
            boundary => {
                if let Some(label) = &self.label {
                    return Err(LoadError::LabelOnBoundary(label.clone(), boundary));
                }
                let children = self
                    .children
                    .iter()
                    .map(RawForm::materialize)
                    .collect::<Result<Vec<Form>, LoadError>>()?;
                Ok(Form::new(boundary, children))
            }
        }
    }
}

/// A puzzle level: start and goal forests plus optional allow-lists.
/// Absent allow-lists permit everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub start: Vec<RawForm>,
    pub goal: Vec<RawForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_axioms: Option<Vec<AxiomTag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_operations: Option<Vec<OperationKey>>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn materialize_start(&self) -> Result<Vec<Form>, LoadError> {
        self.start.iter().map(RawForm::materialize).collect()
    }

    pub fn materialize_goal(&self) -> Result<Vec<Form>, LoadError> {
        self.goal.iter().map(RawForm::materialize).collect()
    }

    pub fn rules(&self) -> Rules {
        Rules {
            axioms: self.allowed_axioms.clone(),
            operations: self.allowed_operations.clone(),
        }
    }
}

/// The allow-lists a loaded level enforces. `None` means unrestricted.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    pub axioms: Option<Vec<AxiomTag>>,
    pub operations: Option<Vec<OperationKey>>,
}

impl Rules {
    /// No restrictions; sandbox default.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn allows_axiom(&self, axiom: AxiomTag) -> bool {
        self.axioms.as_ref().map_or(true, |list| list.contains(&axiom))
    }

    pub fn allows_operation(&self, key: OperationKey) -> bool {
        self.operations
            .as_ref()
            .map_or(true, |list| list.contains(&key))
    }
}

/// Load-boundary contract violations.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("atom is missing a label")]
    MissingLabel,

    #[error("atom label must not be empty")]
    EmptyLabel,

    #[error("atom \"{0}\" cannot have children")]
    AtomWithChildren(String),

    #[error("label \"{0}\" is not allowed on a {1} boundary")]
    LabelOnBoundary(String, Boundary),
}
