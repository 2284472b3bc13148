use pagekit_blocks::{Block, BlockList};
use std::sync::Arc;

/// Visitor pattern for traversing a block tree immutably
///
/// The default implementations walk the whole tree in document order.
/// Override specific visit_* methods to act on nodes; call the matching
/// walk_* function to keep descending.
pub trait BlockVisitor: Sized {
    fn visit_document(&mut self, doc: &BlockList) {
        walk_document(self, doc);
    }

    fn visit_block(&mut self, block: &Arc<Block>) {
        walk_block(self, block);
    }

    fn visit_container(&mut self, _block: &Arc<Block>, children: &BlockList) {
        walk_children(self, children);
    }

    fn visit_leaf(&mut self, _block: &Arc<Block>) {
        // Leaf node, no children to walk
    }
}

pub fn walk_document<V: BlockVisitor>(visitor: &mut V, doc: &BlockList) {
    walk_children(visitor, doc);
}

pub fn walk_block<V: BlockVisitor>(visitor: &mut V, block: &Arc<Block>) {
    match block.children() {
        Some(children) => visitor.visit_container(block, children),
        None => visitor.visit_leaf(block),
    }
}

pub fn walk_children<V: BlockVisitor>(visitor: &mut V, children: &BlockList) {
    for child in children {
        visitor.visit_block(child);
    }
}

/// Per-type node counts, unknown types included
#[derive(Debug, Default)]
pub struct TypeCounter {
    pub counts: std::collections::BTreeMap<String, usize>,
    pub hidden: usize,
    pub protected: usize,
}

impl TypeCounter {
    pub fn count(doc: &BlockList) -> Self {
        let mut counter = Self::default();
        counter.visit_document(doc);
        counter
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl BlockVisitor for TypeCounter {
    fn visit_block(&mut self, block: &Arc<Block>) {
        *self.counts.entry(block.type_tag().to_string()).or_default() += 1;
        if !block.visible {
            self.hidden += 1;
        }
        if block.original {
            self.protected += 1;
        }
        walk_block(self, block);
    }
}
