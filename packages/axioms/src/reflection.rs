//! Reflection axiom: cancel / create.
//!
//! The reflection of a form `A` is `angle(A)`. A form and a reflection of
//! anything structurally identical to it annihilate each other; conversely a
//! form can be produced together with its reflection from nothing. An angle
//! with no children reflects nothing and cancels on its own.

use formwork_model::{canonical_signature, Form};

/// Remove one cancelable pair from the forest.
///
/// A cancelable pair is any two distinct positions where one holds an angle
/// whose single child's canonical signature equals the other position's own
/// signature. The search considers every angle against every other form,
/// not just adjacent positions. A childless angle (void reflection) is
/// removed on its own without a partner.
///
/// Nothing cancelable → fresh clones of every input, unchanged.
pub fn cancel(forms: &[Form]) -> Vec<Form> {
    // A void reflection needs no partner.
    if let Some(void) = forms
        .iter()
        .position(|f| f.is_angle() && f.children.is_empty())
    {
        return clones_without(forms, &[void]);
    }

    let sigs: Vec<String> = forms.iter().map(canonical_signature).collect();
    for (i, form) in forms.iter().enumerate() {
        if !form.is_angle() || form.children.len() != 1 {
            continue;
        }
        let inner = canonical_signature(&form.children[0]);
        for j in 0..forms.len() {
            if j != i && sigs[j] == inner {
                return clones_without(forms, &[i, j]);
            }
        }
    }

    forms.iter().map(Form::deep_clone).collect()
}

/// Produce clones of every template plus one combined angle reflecting all
/// of them. With no templates, the result is a single bare angle, the
/// placeholder from which a pair can later be built.
///
/// Base and reflection are both freshly cloned: they share no ids with each
/// other or with the inputs.
pub fn create(templates: &[Form]) -> Vec<Form> {
    if templates.is_empty() {
        return vec![Form::angle(Vec::new())];
    }
    let mut out: Vec<Form> = templates.iter().map(Form::deep_clone).collect();
    out.push(Form::angle(templates.iter().map(Form::deep_clone).collect()));
    out
}

fn clones_without(forms: &[Form], removed: &[usize]) -> Vec<Form> {
    forms
        .iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, f)| f.deep_clone())
        .collect()
}
