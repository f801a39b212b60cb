//! Inversion axiom: clarify / enfold.
//!
//! A round boundary directly around a square one (or the reverse) says
//! nothing; the pair can be stripped, exposing what was nested two levels
//! down, or wrapped around any group of forms without changing meaning.

use formwork_model::{Boundary, Form};
use serde::{Deserialize, Serialize};

/// Which way round the enfolded boundary pair goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnfoldVariant {
    /// `round(square(...))`
    Frame,
    /// `square(round(...))`
    Mark,
}

/// A form has an *invertible child* iff it has exactly one child and the
/// (parent, child) boundaries are round/square or square/round.
pub fn is_clarify_applicable(form: &Form) -> bool {
    invertible_child(form).is_some()
}

fn invertible_child(form: &Form) -> Option<&Form> {
    if form.children.len() != 1 {
        return None;
    }
    let child = &form.children[0];
    match (form.boundary, child.boundary) {
        (Boundary::Round, Boundary::Square) | (Boundary::Square, Boundary::Round) => Some(child),
        _ => None,
    }
}

/// Strip an invertible boundary pair, returning clones of the inner child's
/// children. The result may hold zero forms (void), one, or many.
///
/// Not applicable → a one-element list holding a fresh clone of the input.
pub fn clarify(form: &Form) -> Vec<Form> {
    match invertible_child(form) {
        Some(inner) => inner.children.iter().map(Form::deep_clone).collect(),
        None => vec![form.deep_clone()],
    }
}

/// Wrap clones of the given forms in a new boundary pair.
///
/// With zero inputs this still produces the pair around an empty inner
/// boundary, which is how an empty pair is created from nothing.
pub fn enfold(variant: EnfoldVariant, forms: &[Form]) -> Form {
    let clones: Vec<Form> = forms.iter().map(Form::deep_clone).collect();
    match variant {
        EnfoldVariant::Frame => Form::round(vec![Form::square(clones)]),
        EnfoldVariant::Mark => Form::square(vec![Form::round(clones)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_model::{canonical_signature, forms_equivalent};

    #[test]
    fn test_applicability() {
        assert!(is_clarify_applicable(&Form::round(vec![Form::square(vec![])])));
        assert!(is_clarify_applicable(&Form::square(vec![Form::round(vec![])])));
        assert!(!is_clarify_applicable(&Form::round(vec![Form::round(vec![])])));
        assert!(!is_clarify_applicable(&Form::round(vec![])));
        assert!(!is_clarify_applicable(&Form::round(vec![
            Form::square(vec![]),
            Form::square(vec![]),
        ])));
        assert!(!is_clarify_applicable(&Form::atom("x")));
    }

    #[test]
    fn test_clarify_inverts_enfold_frame() {
        let f = Form::square(vec![Form::atom("a")]);
        let wrapped = enfold(EnfoldVariant::Frame, std::slice::from_ref(&f));
        let out = clarify(&wrapped);
        assert_eq!(out.len(), 1);
        assert!(forms_equivalent(&out[0], &f));
        assert_ne!(out[0].id, f.id);
    }

    #[test]
    fn test_clarify_inverts_enfold_mark() {
        let f = Form::angle(vec![Form::atom("b")]);
        let wrapped = enfold(EnfoldVariant::Mark, std::slice::from_ref(&f));
        let out = clarify(&wrapped);
        assert_eq!(out.len(), 1);
        assert!(forms_equivalent(&out[0], &f));
    }

    #[test]
    fn test_clarify_exposes_many_grandchildren() {
        let wrapped = enfold(EnfoldVariant::Frame, &[Form::atom("a"), Form::atom("b")]);
        let out = clarify(&wrapped);
        assert_eq!(out.len(), 2);
        assert_eq!(canonical_signature(&out[0]), "atom:a[]");
        assert_eq!(canonical_signature(&out[1]), "atom:b[]");
    }

    #[test]
    fn test_clarify_empty_pair_yields_void() {
        let wrapped = enfold(EnfoldVariant::Mark, &[]);
        assert!(clarify(&wrapped).is_empty());
    }

    #[test]
    fn test_clarify_not_applicable_returns_fresh_clone() {
        let f = Form::round(vec![Form::atom("x")]);
        let out = clarify(&f);
        assert_eq!(out.len(), 1);
        assert!(forms_equivalent(&out[0], &f));
        // No-op still mints fresh ids: the result never aliases the input.
        assert_ne!(out[0].id, f.id);
        assert_ne!(out[0].children[0].id, f.children[0].id);
    }

    #[test]
    fn test_enfold_clones_inputs() {
        let f = Form::atom("x");
        let wrapped = enfold(EnfoldVariant::Frame, std::slice::from_ref(&f));
        assert_eq!(
            canonical_signature(&wrapped),
            "round:[square:[atom:x[]]]"
        );
        assert_ne!(wrapped.children[0].children[0].id, f.id);
    }
}
