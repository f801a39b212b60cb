//! Visitor pattern for traversing form trees immutably.
//!
//! The trait provides a default implementation that walks the entire tree.
//! Override `visit_form` to act on nodes, and call [`walk_form`] from the
//! override to keep descending.
//!
//! There is no mutable counterpart: every rewrite in this engine is a
//! path-copy that produces new nodes, nothing edits a tree in place.

use crate::form::{Form, FormId};
use std::collections::BTreeSet;

/// Visitor over a form tree.
pub trait Visitor: Sized {
    fn visit_form(&mut self, form: &Form) {
        walk_form(self, form);
    }
}

/// Default walk: visit every child of `form`.
pub fn walk_form<V: Visitor>(visitor: &mut V, form: &Form) {
    for child in &form.children {
        visitor.visit_form(child);
    }
}

/// Visit every root of a forest.
pub fn walk_forest<V: Visitor>(visitor: &mut V, forms: &[Form]) {
    for form in forms {
        visitor.visit_form(form);
    }
}

/// Collects every node id in visit order.
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<FormId>,
}

impl Visitor for IdCollector {
    fn visit_form(&mut self, form: &Form) {
        self.ids.push(form.id);
        walk_form(self, form);
    }
}

/// Collects the distinct atom labels in a tree, sorted.
#[derive(Debug, Default)]
pub struct LabelCollector {
    pub labels: BTreeSet<String>,
}

impl Visitor for LabelCollector {
    fn visit_form(&mut self, form: &Form) {
        if let Some(label) = &form.label {
            self.labels.insert(label.clone());
        }
        walk_form(self, form);
    }
}
