//! Document checks for callers that must be authoritative about
//! structure and policy, such as a server accepting saved pages.

use crate::block::{Block, BlockList};
use crate::error::{BlockError, BlockResult};
use crate::tree::{find, walk};
use std::collections::HashSet;

/// Ids appearing more than once, in pre-order of their second occurrence
pub fn duplicate_ids(doc: &BlockList) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for (_, block) in walk(doc) {
        if !seen.insert(block.id.as_str()) && !duplicates.contains(&block.id) {
            duplicates.push(block.id.clone());
        }
    }

    duplicates
}

/// Fails on the first duplicate id
pub fn validate(doc: &BlockList) -> BlockResult<()> {
    match duplicate_ids(doc).into_iter().next() {
        Some(id) => Err(BlockError::DuplicateId(id)),
        None => Ok(()),
    }
}

/// Removal guard for protected blocks
///
/// Removing a node removes its subtree, so a protected descendant blocks the
/// removal as well. A missing id passes: removing it is a no-op anyway.
pub fn check_removable(doc: &BlockList, id: &str) -> BlockResult<()> {
    match find(doc, id).and_then(|block| protected_in(block)) {
        Some(protected) => Err(BlockError::ProtectedBlock(protected.id.clone())),
        None => Ok(()),
    }
}

/// First protected node in `block`'s subtree, `block` itself included
pub fn protected_in(block: &Block) -> Option<&Block> {
    if block.original {
        return Some(block);
    }

    block
        .children()
        .and_then(|children| walk(children).find(|(_, b)| b.original))
        .map(|(_, b)| b.as_ref())
}
