//! Id-addressed node lookup with parent tracking.
//!
//! Operations identify their targets by id, so the first step of every
//! dispatch is resolving ids against the live forest. Missing ids are simply
//! absent from the result; whether that is an error depends on the caller.

use formwork_model::{Form, FormId};
use std::collections::{HashMap, HashSet};

/// A resolved node and its immediate parent (`None` for roots).
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub form: &'a Form,
    pub parent: Option<&'a Form>,
}

/// Depth-first lookup of every requested id.
///
/// Traversal uses an explicit stack and stops early once all requested ids
/// have been found. Ids not present in the forest are absent from the map.
pub fn locate<'a>(forest: &'a [Form], ids: &[FormId]) -> HashMap<FormId, Located<'a>> {
    let wanted: HashSet<FormId> = ids.iter().copied().collect();
    let mut found: HashMap<FormId, Located<'a>> = HashMap::with_capacity(wanted.len());
    if wanted.is_empty() {
        return found;
    }

    let mut stack: Vec<(&'a Form, Option<&'a Form>)> =
        forest.iter().rev().map(|root| (root, None)).collect();

    while let Some((form, parent)) = stack.pop() {
        if wanted.contains(&form.id) {
            found.insert(form.id, Located { form, parent });
            if found.len() == wanted.len() {
                break;
            }
        }
        for child in form.children.iter().rev() {
            stack.push((child, Some(form)));
        }
    }

    found
}

/// Resolve a single id.
pub fn locate_one(forest: &[Form], id: FormId) -> Option<Located<'_>> {
    locate(forest, &[id]).remove(&id)
}
