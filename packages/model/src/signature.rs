//! Canonical signatures: order-invariant structural fingerprints.
//!
//! A signature is `boundary:label[s1,s2,...]` where the child signatures are
//! computed identically and sorted lexicographically before joining, so the
//! iteration order of the children container can never leak into the result.
//! Ids are deliberately excluded: two forms are *structurally equivalent*
//! iff their signatures match, and that is the only notion of sameness used
//! by the axioms, the dispatcher's no-change test, and win detection.
//!
//! Traversal uses an explicit stack rather than recursion so deeply nested
//! puzzles cannot overflow the call stack.

use crate::form::{Form, FormId};
use std::collections::HashMap;

/// Canonical signature of a single form. Pure and total: defined for every
/// well-formed form, with no failure mode.
pub fn canonical_signature(form: &Form) -> String {
    let mut done: HashMap<FormId, String> = HashMap::new();
    let mut stack: Vec<(&Form, bool)> = vec![(form, false)];

    while let Some((node, children_done)) = stack.pop() {
        if children_done {
            let mut child_sigs: Vec<String> = node
                .children
                .iter()
                .map(|child| done.remove(&child.id).unwrap_or_default())
                .collect();
            child_sigs.sort_unstable();
            let sig = format!(
                "{}:{}[{}]",
                node.boundary.as_str(),
                node.label.as_deref().unwrap_or(""),
                child_sigs.join(",")
            );
            done.insert(node.id, sig);
        } else {
            stack.push((node, true));
            for child in &node.children {
                stack.push((child, false));
            }
        }
    }

    done.remove(&form.id).unwrap_or_default()
}

/// Signatures of every root in a forest, sorted ascending.
pub fn forest_signatures(forms: &[Form]) -> Vec<String> {
    let mut sigs: Vec<String> = forms.iter().map(canonical_signature).collect();
    sigs.sort_unstable();
    sigs
}

/// Structural equivalence of two forms.
pub fn forms_equivalent(a: &Form, b: &Form) -> bool {
    canonical_signature(a) == canonical_signature(b)
}

/// Structural equivalence of two forests: equal length and element-wise
/// equal sorted signature lists. Root order is storage order only and does
/// not matter here.
pub fn forests_equivalent(a: &[Form], b: &[Form]) -> bool {
    a.len() == b.len() && forest_signatures(a) == forest_signatures(b)
}

/// CRC32 of a form's canonical signature: a cheap structural fingerprint
/// for map keys and context matching.
pub fn fingerprint(form: &Form) -> u32 {
    signature_fingerprint(&canonical_signature(form))
}

/// CRC32 of an already-computed signature string.
pub fn signature_fingerprint(signature: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(signature.as_bytes());
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_signature() {
        assert_eq!(canonical_signature(&Form::atom("x")), "atom:x[]");
    }

    #[test]
    fn test_empty_boundaries() {
        assert_eq!(canonical_signature(&Form::round(vec![])), "round:[]");
        assert_eq!(canonical_signature(&Form::square(vec![])), "square:[]");
        assert_eq!(canonical_signature(&Form::angle(vec![])), "angle:[]");
    }

    #[test]
    fn test_child_order_does_not_matter() {
        let ab = Form::round(vec![Form::atom("a"), Form::atom("b")]);
        let ba = Form::round(vec![Form::atom("b"), Form::atom("a")]);
        assert_eq!(canonical_signature(&ab), canonical_signature(&ba));
        assert_eq!(canonical_signature(&ab), "round:[atom:a[],atom:b[]]");
    }

    #[test]
    fn test_nested_signature() {
        let f = Form::round(vec![Form::square(vec![Form::atom("a")])]);
        assert_eq!(canonical_signature(&f), "round:[square:[atom:a[]]]");
    }

    #[test]
    fn test_deep_clone_has_same_signature() {
        let f = Form::square(vec![
            Form::angle(vec![Form::atom("v")]),
            Form::round(vec![]),
        ]);
        assert_eq!(canonical_signature(&f), canonical_signature(&f.deep_clone()));
    }

    #[test]
    fn test_structurally_identical_siblings_are_distinct_nodes() {
        // Two siblings with the same signature legitimately coexist.
        let twin_a = Form::atom("t");
        let twin_b = Form::atom("t");
        assert_ne!(twin_a.id, twin_b.id);
        let parent = Form::round(vec![twin_a, twin_b]);
        assert_eq!(canonical_signature(&parent), "round:[atom:t[],atom:t[]]");
    }

    #[test]
    fn test_forest_equivalence_ignores_root_order() {
        let a = vec![Form::atom("x"), Form::round(vec![])];
        let b = vec![Form::round(vec![]), Form::atom("x")];
        assert!(forests_equivalent(&a, &b));
    }

    #[test]
    fn test_forest_equivalence_requires_equal_length() {
        let a = vec![Form::atom("x")];
        let b = vec![Form::atom("x"), Form::atom("x")];
        assert!(!forests_equivalent(&a, &b));
    }

    #[test]
    fn test_fingerprint_tracks_signature() {
        let f = Form::round(vec![Form::atom("a")]);
        let g = f.deep_clone();
        assert_eq!(fingerprint(&f), fingerprint(&g));
        assert_ne!(fingerprint(&f), fingerprint(&Form::round(vec![])));
    }

    #[test]
    fn test_deeply_nested_does_not_overflow() {
        let mut form = Form::atom("leaf");
        for _ in 0..4_000 {
            form = Form::round(vec![form]);
        }
        let sig = canonical_signature(&form);
        assert!(sig.starts_with("round:[round:["));
    }
}
