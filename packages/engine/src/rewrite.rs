//! Immutable path-copy rewriting.
//!
//! A rewrite never mutates its input forest. It rebuilds every ancestor on
//! the path from a root to the changed position: each ancestor keeps its
//! own id but gets a freshly assembled children container, while siblings
//! off the path are carried over with their ids intact. The transform's
//! outputs are spliced in place of the original node, so a transform may
//! replace one node with zero, one, or many.
//!
//! `None` means "not modified": the target could not be resolved (or, for
//! sibling groups, the selection was invalid). This is distinct from
//! `Some(vec![])`, a successful rewrite that emptied the forest.

use crate::locate::{locate, locate_one};
use formwork_model::{Form, FormId};
use std::collections::HashSet;

/// Rewrite the single node `target_id` wherever it sits in the forest.
///
/// Returns `None` iff `target_id` is not found anywhere.
pub fn rewrite_single_target<F>(forest: &[Form], target_id: FormId, transform: F) -> Option<Vec<Form>>
where
    F: FnOnce(&Form) -> Vec<Form>,
{
    let path = find_path(forest, target_id)?;
    let idx = path[0];
    let mut out: Vec<Form> = Vec::with_capacity(forest.len() + 1);
    out.extend(forest[..idx].iter().cloned());
    if path.len() == 1 {
        out.extend(transform(&forest[idx]));
    } else {
        out.push(rebuild(&forest[idx], &path[1..], transform));
    }
    out.extend(forest[idx + 1..].iter().cloned());
    Some(out)
}

/// Rewrite an id-selected group of siblings together.
///
/// Fails (`None`) unless every id resolves and all resolved nodes share
/// exactly one parent (or are all roots). The transform receives the
/// resolved nodes in sibling order; its outputs are spliced at the first
/// member's position and the other members are removed, so untouched
/// siblings retain their positions. Duplicate ids are deduplicated.
pub fn rewrite_sibling_group<F>(
    forest: &[Form],
    target_ids: &[FormId],
    transform: F,
) -> Option<Vec<Form>>
where
    F: FnOnce(&[&Form]) -> Vec<Form>,
{
    let mut ids: Vec<FormId> = Vec::with_capacity(target_ids.len());
    for id in target_ids {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    if ids.is_empty() {
        return None;
    }

    let found = locate(forest, &ids);
    if found.len() != ids.len() {
        return None;
    }
    let parent_id = found[&ids[0]].parent.map(|p| p.id);
    if ids.iter().any(|id| found[id].parent.map(|p| p.id) != parent_id) {
        return None;
    }

    let members: HashSet<FormId> = ids.into_iter().collect();
    match parent_id {
        None => Some(splice_group(forest, &members, transform)),
        Some(pid) => rewrite_single_target(forest, pid, move |parent| {
            vec![Form {
                id: parent.id,
                boundary: parent.boundary,
                label: parent.label.clone(),
                children: splice_group(&parent.children, &members, transform),
            }]
        }),
    }
}

/// Append `form` under `parent_id`, or as a new root when `parent_id` is
/// `None`. The parent keeps its id; ancestors are path-copied as usual.
/// Returns `None` when the parent id is not found, or when it names an
/// atom (atoms never carry children).
pub fn insert_under(forest: &[Form], parent_id: Option<FormId>, form: Form) -> Option<Vec<Form>> {
    match parent_id {
        None => {
            let mut out = forest.to_vec();
            out.push(form);
            Some(out)
        }
        Some(pid) => {
            let located = locate_one(forest, pid)?;
            if located.form.is_atom() {
                return None;
            }
            rewrite_single_target(forest, pid, move |parent| {
                let mut children = parent.children.clone();
                children.push(form);
                vec![Form {
                    id: parent.id,
                    boundary: parent.boundary,
                    label: parent.label.clone(),
                    children,
                }]
            })
        }
    }
}

/// Child-index path from a root down to `target`, root index first.
/// Explicit-stack DFS, so nesting depth never grows the call stack.
fn find_path(forest: &[Form], target: FormId) -> Option<Vec<usize>> {
    for (i, root) in forest.iter().enumerate() {
        if root.id == target {
            return Some(vec![i]);
        }
        let mut path = vec![i];
        let mut frames: Vec<(&Form, usize)> = vec![(root, 0)];
        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            if next < node.children.len() {
                frame.1 += 1;
                let child = &node.children[next];
                path.push(next);
                if child.id == target {
                    return Some(path);
                }
                frames.push((child, 0));
            } else {
                frames.pop();
                path.pop();
            }
        }
    }
    None
}

/// Rebuild `root` along a non-empty `path`, splicing the transform's output
/// over the node the path ends at. Walks down collecting ancestors, then
/// reassembles bottom-up; no recursion on path depth.
fn rebuild<F>(root: &Form, path: &[usize], transform: F) -> Form
where
    F: FnOnce(&Form) -> Vec<Form>,
{
    let mut ancestors: Vec<&Form> = Vec::with_capacity(path.len());
    let mut node = root;
    for &idx in &path[..path.len() - 1] {
        ancestors.push(node);
        node = &node.children[idx];
    }

    let last = path[path.len() - 1];
    let mut children: Vec<Form> = Vec::with_capacity(node.children.len() + 1);
    children.extend(node.children[..last].iter().cloned());
    children.extend(transform(&node.children[last]));
    children.extend(node.children[last + 1..].iter().cloned());
    let mut rebuilt = Form {
        id: node.id,
        boundary: node.boundary,
        label: node.label.clone(),
        children,
    };

    for (ancestor, &idx) in ancestors.iter().zip(path.iter()).rev() {
        let mut children: Vec<Form> = Vec::with_capacity(ancestor.children.len());
        children.extend(ancestor.children[..idx].iter().cloned());
        children.push(rebuilt);
        children.extend(ancestor.children[idx + 1..].iter().cloned());
        rebuilt = Form {
            id: ancestor.id,
            boundary: ancestor.boundary,
            label: ancestor.label.clone(),
            children,
        };
    }
    rebuilt
}

fn splice_group<F>(siblings: &[Form], members: &HashSet<FormId>, transform: F) -> Vec<Form>
where
    F: FnOnce(&[&Form]) -> Vec<Form>,
{
    let group: Vec<&Form> = siblings.iter().filter(|f| members.contains(&f.id)).collect();
    let splice_at = siblings
        .iter()
        .position(|f| members.contains(&f.id))
        .unwrap_or(0);
    let mut replacement = Some(transform(&group));

    let mut out: Vec<Form> = Vec::with_capacity(siblings.len());
    for (i, sibling) in siblings.iter().enumerate() {
        if members.contains(&sibling.id) {
            if i == splice_at {
                if let Some(forms) = replacement.take() {
                    out.extend(forms);
                }
            }
        } else {
            out.push(sibling.clone());
        }
    }
    out
}
