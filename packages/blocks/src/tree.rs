//! # Tree Mutations
//!
//! Pure structural operations on page documents.
//!
//! ## Design Principles
//!
//! 1. **Snapshot in, snapshot out**: the input document is never modified
//! 2. **Path copying**: only the nodes on the path to the target are rebuilt,
//!    every other subtree keeps its `Arc`
//! 3. **Total**: a missing id is a no-op that returns the input document
//!    (pointer-equal), never an error
//!
//! ## Traversal
//!
//! Every id-addressed operation walks depth-first, pre-order, and stops at the
//! first node whose id matches. Ids are unique within a document, so the first
//! match is the only one.
//!
//! ## Insert modes
//!
//! - `Adjacent`: right after the target, in the target's parent sequence
//! - `Inside(Start | End)`: prepended/appended to a container's children.
//!   A leaf target rejects the insert and the document is returned unchanged.

use crate::block::{Block, BlockList};
use crate::error::{BlockError, BlockResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Where an inside insert lands in the container's children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Start,
    #[default]
    End,
}

/// Placement of an inserted block relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "position", rename_all = "lowercase")]
pub enum InsertMode {
    Adjacent,
    Inside(Position),
}

impl InsertMode {
    /// Append inside the target
    pub fn inside() -> Self {
        InsertMode::Inside(Position::End)
    }
}

impl Default for InsertMode {
    fn default() -> Self {
        InsertMode::Adjacent
    }
}

/// What to put in place of a matched node
enum Splice {
    /// Target found but it rejects the edit
    Keep,
    /// Replace the target with these nodes (empty removes it)
    With(Vec<Arc<Block>>),
}

enum Visit {
    NotFound,
    Unchanged,
    Changed(BlockList),
}

fn splice_at<F>(list: &BlockList, id: &str, edit: &mut F) -> Visit
where
    F: FnMut(&Arc<Block>) -> Splice,
{
    for (index, block) in list.iter().enumerate() {
        if block.id == id {
            return match edit(block) {
                Splice::Keep => Visit::Unchanged,
                Splice::With(nodes) => {
                    let mut next = Vec::with_capacity(list.len() - 1 + nodes.len());
                    next.extend(list[..index].iter().cloned());
                    next.extend(nodes);
                    next.extend(list[index + 1..].iter().cloned());
                    Visit::Changed(BlockList::from_vec(next))
                }
            };
        }

        let Some(children) = block.children() else {
            continue;
        };

        match splice_at(children, id, edit) {
            Visit::NotFound => continue,
            Visit::Unchanged => return Visit::Unchanged,
            Visit::Changed(children) => {
                let Some(parent) = block.with_children(children) else {
                    return Visit::Unchanged;
                };
                let mut next = list.to_vec();
                next[index] = Arc::new(parent);
                return Visit::Changed(BlockList::from_vec(next));
            }
        }
    }

    Visit::NotFound
}

fn apply<F>(doc: &BlockList, id: &str, mut edit: F) -> BlockList
where
    F: FnMut(&Arc<Block>) -> Splice,
{
    match splice_at(doc, id, &mut edit) {
        Visit::Changed(next) => next,
        Visit::NotFound => {
            debug!(target_id = %id, "Target not in document, no-op");
            doc.clone()
        }
        Visit::Unchanged => doc.clone(),
    }
}

/// Locate a node anywhere in the tree
pub fn find<'a>(doc: &'a BlockList, id: &str) -> Option<&'a Arc<Block>> {
    for block in doc {
        if block.id == id {
            return Some(block);
        }
        if let Some(found) = block.children().and_then(|children| find(children, id)) {
            return Some(found);
        }
    }
    None
}

pub fn contains(doc: &BlockList, id: &str) -> bool {
    find(doc, id).is_some()
}

/// Replace the node with `id` by `replacement`
pub fn find_and_replace(
    doc: &BlockList,
    id: &str,
    replacement: impl Into<Arc<Block>>,
) -> BlockList {
    let replacement = replacement.into();
    apply(doc, id, |_| Splice::With(vec![replacement.clone()]))
}

/// Insert `block` relative to the node with `id`
pub fn insert(
    doc: &BlockList,
    id: &str,
    block: impl Into<Arc<Block>>,
    mode: InsertMode,
) -> BlockList {
    let block = block.into();

    apply(doc, id, |target| match mode {
        InsertMode::Adjacent => Splice::With(vec![target.clone(), block.clone()]),
        InsertMode::Inside(position) => {
            let Some(children) = target.children() else {
                debug!(
                    target_id = %target.id,
                    target_type = target.type_tag(),
                    "Inside insert on leaf, no-op"
                );
                return Splice::Keep;
            };

            let mut next = children.to_vec();
            match position {
                Position::Start => next.insert(0, block.clone()),
                Position::End => next.push(block.clone()),
            }

            match target.with_children(BlockList::from_vec(next)) {
                Some(container) => Splice::With(vec![Arc::new(container)]),
                None => Splice::Keep,
            }
        }
    })
}

/// Delete the node with `id` and its whole subtree
pub fn remove(doc: &BlockList, id: &str) -> BlockList {
    apply(doc, id, |_| Splice::With(Vec::new()))
}

/// Replace the node with `id` by `wrap(node)`
///
/// `wrap` is expected to return a container whose only child is the node it
/// was given. It is not called when `id` is absent.
pub fn wrap<F>(doc: &BlockList, id: &str, wrap: F) -> BlockList
where
    F: FnOnce(Arc<Block>) -> Block,
{
    let mut wrap = Some(wrap);
    apply(doc, id, |target| match wrap.take() {
        Some(wrap) => Splice::With(vec![Arc::new(wrap(target.clone()))]),
        None => Splice::Keep,
    })
}

/// Append at the root
pub fn append(doc: &BlockList, block: impl Into<Arc<Block>>) -> BlockList {
    let mut next = doc.to_vec();
    next.push(block.into());
    BlockList::from_vec(next)
}

/// Detach the node with `id` and insert it relative to `target_id`
///
/// A missing source or target, or an inside move onto a leaf, leaves the
/// document unchanged. Moving a node relative to itself or to one of its
/// descendants is a cycle.
pub fn move_block(
    doc: &BlockList,
    id: &str,
    target_id: &str,
    mode: InsertMode,
) -> BlockResult<BlockList> {
    let Some(source) = find(doc, id) else {
        return Ok(doc.clone());
    };

    let into_source = source.children().is_some_and(|c| contains(c, target_id));
    if id == target_id || into_source {
        return Err(BlockError::CycleDetected(id.to_string()));
    }

    let Some(target) = find(doc, target_id) else {
        return Ok(doc.clone());
    };
    if matches!(mode, InsertMode::Inside(_)) && !target.is_container() {
        debug!(target_id = %target_id, "Inside move onto leaf, no-op");
        return Ok(doc.clone());
    }

    let source = source.clone();
    let detached = remove(doc, id);
    Ok(insert(&detached, target_id, source, mode))
}

/// Container holding the node with `id`; `None` at the root or when absent
pub fn parent_of<'a>(doc: &'a BlockList, id: &str) -> Option<&'a Arc<Block>> {
    path_to(doc, id).and_then(|path| {
        let len = path.len();
        if len >= 2 {
            Some(path[len - 2])
        } else {
            None
        }
    })
}

/// Nodes from the root-level ancestor down to the node with `id`
pub fn path_to<'a>(doc: &'a BlockList, id: &str) -> Option<Vec<&'a Arc<Block>>> {
    fn descend<'a>(list: &'a BlockList, id: &str, path: &mut Vec<&'a Arc<Block>>) -> bool {
        for block in list {
            path.push(block);
            if block.id == id {
                return true;
            }
            if let Some(children) = block.children() {
                if descend(children, id, path) {
                    return true;
                }
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    descend(doc, id, &mut path).then_some(path)
}

/// Pre-order iterator over every node with its depth (root level = 0)
pub fn walk(doc: &BlockList) -> Walk<'_> {
    Walk {
        stack: vec![(doc.iter(), 0)],
    }
}

pub struct Walk<'a> {
    stack: Vec<(std::slice::Iter<'a, Arc<Block>>, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Arc<Block>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (iter, depth) = self.stack.last_mut()?;
            let depth = *depth;
            match iter.next() {
                Some(block) => {
                    if let Some(children) = block.children() {
                        self.stack.push((children.iter(), depth + 1));
                    }
                    return Some((depth, block));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Total number of nodes, descendants included
pub fn count(doc: &BlockList) -> usize {
    walk(doc).count()
}
