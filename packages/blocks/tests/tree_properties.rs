//! Structural guarantees of the tree mutation engine
//!
//! This tests:
//! - Id uniqueness over create + insert sequences
//! - Sharing of untouched sibling subtrees
//! - No-op behavior for missing targets and leaf inside-inserts
//! - Insert-then-remove identity and wrap content preservation

use pagekit_blocks::{
    tree, validate, Block, BlockList, BlockRegistry, BlockType, InsertMode, Position, Properties,
    TextProps,
};
use std::sync::Arc;

/// Builds documents from a fixed pseudo-random sequence of inserts
struct DocBuilder {
    registry: BlockRegistry,
    state: u64,
}

impl DocBuilder {
    fn new(seed: u64) -> Self {
        Self {
            registry: BlockRegistry::sequential("doc"),
            state: seed,
        }
    }

    fn next(&mut self, bound: usize) -> usize {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 33) as usize) % bound
    }

    fn build(&mut self, steps: usize) -> BlockList {
        let mut doc = BlockList::new();

        for _ in 0..steps {
            let block_type = BlockType::ALL[self.next(BlockType::ALL.len())];
            let block = self.registry.create(block_type);

            let ids: Vec<String> = tree::walk(&doc).map(|(_, b)| b.id.clone()).collect();
            if ids.is_empty() {
                doc = tree::append(&doc, block);
                continue;
            }

            let target = ids[self.next(ids.len())].clone();
            let mode = match self.next(3) {
                0 => InsertMode::Adjacent,
                1 => InsertMode::Inside(Position::Start),
                _ => InsertMode::Inside(Position::End),
            };
            doc = tree::insert(&doc, &target, block, mode);
        }

        doc
    }
}

fn text(id: &str, content: &str) -> Block {
    Block::new(id, Properties::Text(TextProps::new(content)))
}

#[test]
fn test_ids_stay_unique() {
    for seed in 0..20 {
        let doc = DocBuilder::new(seed).build(60);
        assert!(
            validate::validate(&doc).is_ok(),
            "seed {} produced duplicate ids",
            seed
        );
    }
}

#[test]
fn test_sibling_subtrees_are_shared() {
    for seed in 0..20 {
        let doc = DocBuilder::new(seed).build(40);
        if doc.len() < 2 {
            continue;
        }

        // Edit somewhere inside the last root-level subtree
        let last = doc.last().unwrap();
        let target = tree::walk(&BlockList::from_vec(vec![last.clone()]))
            .last()
            .map(|(_, b)| b.id.clone())
            .unwrap();

        let edited = tree::remove(&doc, &target);
        for (before, after) in doc[..doc.len() - 1].iter().zip(edited.iter()) {
            assert!(
                Arc::ptr_eq(before, after),
                "seed {}: sibling {} was rebuilt",
                seed, before.id
            );
        }
    }
}

#[test]
fn test_missing_targets_are_noops() {
    let doc = DocBuilder::new(7).build(30);
    let fresh = text("fresh", "");

    let adjacent = tree::insert(&doc, "nonexistent-id", fresh.clone(), InsertMode::Adjacent);
    assert_eq!(adjacent, doc);
    let inside = tree::insert(&doc, "nonexistent-id", fresh, InsertMode::inside());
    assert_eq!(inside, doc);
    assert_eq!(tree::remove(&doc, "nonexistent-id"), doc);
}

#[test]
fn test_insert_then_remove_is_identity() {
    for seed in 0..10 {
        let doc = DocBuilder::new(seed).build(25);

        for (_, target) in tree::walk(&doc) {
            let inserted = tree::insert(&doc, &target.id, text("y", "new"), InsertMode::Adjacent);
            assert_eq!(tree::count(&inserted), tree::count(&doc) + 1);
            assert_eq!(tree::remove(&inserted, "y"), doc);
        }
    }
}

#[test]
fn test_wrap_preserves_content() {
    let doc = DocBuilder::new(3).build(25);
    let mut registry = BlockRegistry::sequential("wrap");

    for (_, target) in tree::walk(&doc) {
        let original = serde_json::to_value(target.as_ref()).unwrap();
        let wrapper = registry.create(BlockType::Row);
        let wrapper_id = wrapper.id.clone();

        let wrapped = tree::wrap(&doc, &target.id, |child| {
            let children = BlockList::from_vec(vec![child]);
            wrapper.with_children(children).unwrap()
        });

        let container = tree::find(&wrapped, &wrapper_id).unwrap();
        let children = container.children().unwrap();
        assert_eq!(children.len(), 1);
        let copied = serde_json::to_value(children[0].as_ref()).unwrap();
        assert_eq!(copied, original);
        let parent = tree::parent_of(&wrapped, &target.id).unwrap();
        assert_eq!(parent.id, wrapper_id);
    }
}

#[test]
fn test_inside_insert_on_leaf_is_noop() {
    let doc = BlockList::from(vec![text("x", "leaf")]);
    let unchanged = tree::insert(&doc, "x", text("n", ""), InsertMode::inside());
    assert_eq!(unchanged, doc);
}

#[test]
fn test_group_scenario() {
    let doc: BlockList = serde_json::from_value(serde_json::json!([
        { "id": "a", "type": "group", "properties": { "blocks": [] } }
    ]))
    .unwrap();

    let end = InsertMode::Inside(Position::End);
    let doc2 = tree::insert(&doc, "a", text("b", "hi"), end);
    assert_eq!(
        serde_json::to_value(&doc2).unwrap(),
        serde_json::json!([
            { "id": "a", "type": "group", "visible": true, "original": false, "properties": {
                "blocks": [
                    { "id": "b", "type": "text", "visible": true, "original": false,
                      "properties": { "content": "hi" } }
                ]
            } }
        ])
    );

    let doc3 = tree::remove(&doc2, "a");
    assert!(doc3.is_empty());
}

#[test]
fn test_unknown_types_survive_mutations() {
    let doc: BlockList = serde_json::from_value(serde_json::json!([
        { "id": "m", "type": "map", "properties": { "lat": 41.4, "lng": 2.17 } },
        { "id": "g", "type": "group", "properties": { "blocks": [] } }
    ]))
    .unwrap();

    let next = tree::insert(&doc, "g", text("t", ""), InsertMode::inside());
    let next = tree::insert(&next, "m", text("u", ""), InsertMode::inside());

    let stored = serde_json::to_value(&next).unwrap();
    assert_eq!(stored[0]["type"], "map");
    assert_eq!(stored[0]["properties"]["lat"], 41.4);
    assert_eq!(tree::count(&next), 3);
}
