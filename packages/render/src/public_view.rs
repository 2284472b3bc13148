//! Public page rendering.
//!
//! Hidden nodes are skipped together with their subtrees, and `text-query`
//! placeholders are filled from the page URL query parameters.

use crate::node::{Content, Presentation, RenderNode};
use crate::visitor::{walk_block, walk_children, BlockVisitor};
use pagekit_blocks::{Block, BlockList, Properties};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// URL query parameters of the page request
pub type QueryParams = HashMap<String, String>;

pub struct PublicView<'q> {
    query: &'q QueryParams,
    /// Children being collected, one frame per open container
    frames: Vec<Vec<RenderNode>>,
    skipped: usize,
}

impl<'q> PublicView<'q> {
    pub fn build(doc: &BlockList, query: &'q QueryParams) -> Vec<RenderNode> {
        let mut view = PublicView {
            query,
            frames: vec![Vec::new()],
            skipped: 0,
        };
        view.visit_document(doc);
        view.finish()
    }

    fn finish(mut self) -> Vec<RenderNode> {
        if self.skipped > 0 {
            debug!(
                skipped = self.skipped,
                "Hidden blocks left out of public page"
            );
        }
        self.frames.pop().unwrap_or_default()
    }

    fn content(&self, block: &Block) -> Content {
        match &block.properties {
            Properties::TextQuery(p) => Content::Text {
                content: p.resolve(self.query.get(&p.query).map(String::as_str)),
            },
            _ => Content::of(block),
        }
    }

    fn push(&mut self, node: RenderNode) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(node);
        }
    }

    fn node(&self, block: &Block, children: Vec<RenderNode>) -> RenderNode {
        RenderNode {
            id: block.id.clone(),
            block_type: block.type_tag().to_string(),
            content: self.content(block),
            presentation: Presentation::of(block),
            children,
        }
    }
}

impl BlockVisitor for PublicView<'_> {
    fn visit_block(&mut self, block: &Arc<Block>) {
        if !block.visible {
            self.skipped += 1;
            return;
        }
        walk_block(self, block);
    }

    fn visit_container(&mut self, block: &Arc<Block>, children: &BlockList) {
        self.frames.push(Vec::new());
        walk_children(self, children);
        let children = self.frames.pop().unwrap_or_default();

        let node = self.node(block, children);
        self.push(node);
    }

    fn visit_leaf(&mut self, block: &Arc<Block>) {
        let node = self.node(block, Vec::new());
        self.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> BlockList {
        serde_json::from_value(json!([
            { "id": "greeting", "type": "text-query", "properties": {
                "content": "Dear {value}, you are invited", "query": "guest", "fallback": "friend"
            } },
            { "id": "secret", "type": "group", "visible": false, "properties": { "blocks": [
                { "id": "inner", "type": "text", "properties": { "content": "hidden" } }
            ] } },
            { "id": "row", "type": "row", "class": "gap-2", "properties": { "blocks": [
                { "id": "pic", "type": "image", "properties": { "file": "a.png" } },
                { "id": "off", "type": "rsvp", "visible": false }
            ] } }
        ]))
        .unwrap()
    }

    #[test]
    fn test_query_fills_placeholder() {
        let query = QueryParams::from([("guest".to_string(), "Ana".to_string())]);
        let nodes = PublicView::build(&doc(), &query);

        assert_eq!(
            nodes[0].content,
            Content::Text {
                content: "Dear Ana, you are invited".to_string()
            }
        );
    }

    #[test]
    fn test_missing_query_uses_fallback() {
        let nodes = PublicView::build(&doc(), &QueryParams::new());
        assert_eq!(
            nodes[0].content,
            Content::Text {
                content: "Dear friend, you are invited".to_string()
            }
        );
    }

    #[test]
    fn test_hidden_subtrees_are_skipped() {
        let nodes = PublicView::build(&doc(), &QueryParams::new());

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["greeting", "row"]);

        let row = &nodes[1];
        assert_eq!(row.presentation.class.as_deref(), Some("gap-2"));
        assert_eq!(row.children.len(), 1);
        assert_eq!(row.children[0].id, "pic");
    }
}
