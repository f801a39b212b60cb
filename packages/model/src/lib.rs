//! # Formwork Model
//!
//! Core tree model for boundary forms.
//!
//! A [`Form`] is a finite tree of boundary nodes: `round`, `square`, and
//! `angle` containers, plus labeled `atom` leaves. Every node carries a
//! process-unique [`FormId`]; transformation code never mutates a node in
//! place, it produces fresh nodes instead.
//!
//! ## Determinism Contract
//!
//! **INVARIANT: structural identity ignores ids.**
//!
//! Two forms are "the same" iff their canonical signatures match. Signatures
//! are deterministic for a given structure:
//!
//! - Same structure → same signature string, regardless of child order
//! - Ids never leak into signatures
//! - No HashMap iteration order leaks (children are ordered `Vec`s and child
//!   signatures are sorted before joining)
//!
//! This is the sole notion of sameness used by the axioms, the dispatcher's
//! no-change test, and win detection.

pub mod form;
pub mod signature;
pub mod visitor;

pub use form::{deep_clone_forest, Boundary, Form, FormId};
pub use signature::{
    canonical_signature, fingerprint, forest_signatures, forests_equivalent, forms_equivalent,
};
pub use visitor::{walk_forest, walk_form, IdCollector, LabelCollector, Visitor};
