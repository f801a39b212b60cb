//! Arrangement axiom: disperse / collect.
//!
//! A *frame* is a round form holding at least one square child. Disperse
//! splits a frame into one frame per content of a chosen square, each keeping
//! a copy of the frame's context; collect merges frames whose contexts match
//! back into one. An empty square dominates its frame: the whole frame
//! collapses to nothing (the dominion rule).

use formwork_model::signature::signature_fingerprint;
use formwork_model::{canonical_signature, Form, FormId};
use std::collections::HashSet;

/// Optional target selection for [`disperse`].
#[derive(Debug, Clone, Default)]
pub struct DisperseOptions {
    /// The square child to split on; defaults to the frame's first square.
    pub square_id: Option<FormId>,
    /// The subset of that square's children to split out; defaults to all.
    /// Duplicate ids are deduplicated before matching.
    pub content_ids: Option<Vec<FormId>>,
}

impl DisperseOptions {
    pub fn square(square_id: FormId) -> Self {
        Self {
            square_id: Some(square_id),
            content_ids: None,
        }
    }

    pub fn contents(content_ids: Vec<FormId>) -> Self {
        Self {
            square_id: None,
            content_ids: Some(content_ids),
        }
    }
}

/// True iff `form` is a frame: a round form with at least one square child.
pub fn is_frame(form: &Form) -> bool {
    form.is_round() && form.children.iter().any(Form::is_square)
}

/// Split a frame along one of its squares.
///
/// Each picked content becomes its own frame holding clones of the context
/// (the frame's children other than the target square) plus a new square
/// around just that content. Unpicked contents stay together in one extra
/// frame prepended to the result. An empty target square collapses the frame
/// to nothing.
///
/// Not applicable (not a frame, unknown square, unmatched content id) → a
/// one-element list holding a fresh clone of the input.
pub fn disperse(form: &Form, options: &DisperseOptions) -> Vec<Form> {
    if !is_frame(form) {
        return vec![form.deep_clone()];
    }

    let target = match options.square_id {
        Some(id) => form.children.iter().find(|c| c.is_square() && c.id == id),
        None => form.children.iter().find(|c| c.is_square()),
    };
    let target = match target {
        Some(square) => square,
        None => return vec![form.deep_clone()],
    };

    // Dominion: an empty square voids the whole frame.
    if target.children.is_empty() {
        return Vec::new();
    }

    let (picked, remaining): (Vec<&Form>, Vec<&Form>) = match &options.content_ids {
        Some(ids) => {
            let requested: HashSet<FormId> = ids.iter().copied().collect();
            let known: HashSet<FormId> = target.children.iter().map(|c| c.id).collect();
            if !requested.is_subset(&known) {
                // A stale or foreign content id makes the whole call inapplicable.
                return vec![form.deep_clone()];
            }
            target.children.iter().partition(|c| requested.contains(&c.id))
        }
        None => (target.children.iter().collect(), Vec::new()),
    };

    let context: Vec<&Form> = form.children.iter().filter(|c| c.id != target.id).collect();
    let frame_around = |contents: Vec<Form>| -> Form {
        let mut children: Vec<Form> = context.iter().map(|c| c.deep_clone()).collect();
        children.push(Form::square(contents));
        Form::round(children)
    };

    let mut result = Vec::with_capacity(picked.len() + 1);
    if !remaining.is_empty() {
        result.push(frame_around(remaining.iter().map(|c| c.deep_clone()).collect()));
    }
    for content in picked {
        result.push(frame_around(vec![content.deep_clone()]));
    }
    result
}

/// Merge frames whose contexts match into a single frame.
///
/// Candidate target squares are taken from the first input form only: each
/// non-empty square child of the first form is tried in turn, and the first
/// candidate for which every other form holds a non-empty square with the
/// same context fingerprint wins. The matched squares' children are merged
/// into one square alongside one copy of the shared context.
///
/// No fully matching candidate → fresh clones of every input, unchanged.
pub fn collect(forms: &[Form]) -> Vec<Form> {
    let not_applicable = || forms.iter().map(Form::deep_clone).collect::<Vec<_>>();

    if forms.is_empty() || !forms.iter().all(is_frame) {
        return not_applicable();
    }

    let first = &forms[0];
    for candidate in first.children.iter() {
        if !candidate.is_square() || candidate.children.is_empty() {
            continue;
        }
        let wanted = context_fingerprint(first, candidate.id);

        let mut matched: Vec<&Form> = vec![candidate];
        for form in &forms[1..] {
            let found = form.children.iter().find(|c| {
                c.is_square()
                    && !c.children.is_empty()
                    && context_fingerprint(form, c.id) == wanted
            });
            match found {
                Some(square) => matched.push(square),
                None => break,
            }
        }
        if matched.len() != forms.len() {
            continue;
        }

        let merged: Vec<Form> = matched
            .iter()
            .flat_map(|square| square.children.iter().map(Form::deep_clone))
            .collect();
        // Dominion: an empty merge collapses the aggregate entirely.
        if merged.is_empty() {
            return Vec::new();
        }

        let mut children: Vec<Form> = first
            .children
            .iter()
            .filter(|c| c.id != candidate.id)
            .map(Form::deep_clone)
            .collect();
        children.push(Form::square(merged));
        return vec![Form::round(children)];
    }

    not_applicable()
}

/// Fingerprint of a frame's context relative to one of its children: the
/// sorted signature multiset of every child except `excluded`.
fn context_fingerprint(frame: &Form, excluded: FormId) -> u32 {
    let mut sigs: Vec<String> = frame
        .children
        .iter()
        .filter(|c| c.id != excluded)
        .map(canonical_signature)
        .collect();
    sigs.sort_unstable();
    signature_fingerprint(&sigs.join(","))
}
