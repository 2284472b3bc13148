//! Editor rendering.
//!
//! Every node is shown, hidden ones included, together with the edit
//! actions the session will accept for it. Actions turn into [`Mutation`]
//! values addressed by node id.

use crate::node::{Content, Presentation};
use crate::visitor::{walk_children, BlockVisitor};
use pagekit_blocks::{validate, Block, BlockList, BlockType, InsertMode, Properties};
use pagekit_editor::Mutation;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Update,
    ToggleVisibility,
    InsertAfter,
    InsertInside,
    Wrap,
    Duplicate,
    Remove,
}

impl EditAction {
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::Update => "Edit",
            EditAction::ToggleVisibility => "Show/hide",
            EditAction::InsertAfter => "Add after",
            EditAction::InsertInside => "Add inside",
            EditAction::Wrap => "Wrap",
            EditAction::Duplicate => "Duplicate",
            EditAction::Remove => "Delete",
        }
    }
}

/// Node of the editor canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableNode {
    pub id: String,
    pub block_type: String,
    pub content: Content,
    #[serde(flatten)]
    pub presentation: Presentation,
    pub visible: bool,
    pub protected: bool,
    pub actions: Vec<EditAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EditableNode>,
}

impl EditableNode {
    fn new(block: &Block, children: Vec<EditableNode>) -> Self {
        Self {
            id: block.id.clone(),
            block_type: block.type_tag().to_string(),
            content: Content::of(block),
            presentation: Presentation::of(block),
            visible: block.visible,
            protected: block.original,
            actions: actions_for(block),
            children,
        }
    }

    pub fn allows(&self, action: EditAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn update(&self, properties: Properties) -> Option<Mutation> {
        self.allows(EditAction::Update)
            .then(|| Mutation::UpdateBlock {
                id: self.id.clone(),
                properties,
            })
    }

    pub fn toggle_visibility(&self) -> Mutation {
        Mutation::SetVisible {
            id: self.id.clone(),
            visible: !self.visible,
        }
    }

    pub fn insert_after(&self, block_type: BlockType) -> Mutation {
        Mutation::AddBlock {
            block_type,
            target_id: Some(self.id.clone()),
            placement: InsertMode::Adjacent,
        }
    }

    pub fn insert_inside(&self, block_type: BlockType) -> Option<Mutation> {
        self.allows(EditAction::InsertInside)
            .then(|| Mutation::AddBlock {
                block_type,
                target_id: Some(self.id.clone()),
                placement: InsertMode::inside(),
            })
    }

    /// `None` when `wrapper` cannot hold children
    pub fn wrap(&self, wrapper: BlockType) -> Option<Mutation> {
        wrapper.is_container().then(|| Mutation::WrapBlock {
            id: self.id.clone(),
            wrapper,
        })
    }

    pub fn duplicate(&self) -> Mutation {
        Mutation::DuplicateBlock {
            id: self.id.clone(),
        }
    }

    /// `None` for protected nodes and for nodes with protected descendants
    pub fn remove(&self) -> Option<Mutation> {
        self.allows(EditAction::Remove)
            .then(|| Mutation::RemoveBlock {
                id: self.id.clone(),
            })
    }

    /// This node and its descendants in document order
    pub fn iter(&self) -> impl Iterator<Item = &EditableNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

fn actions_for(block: &Block) -> Vec<EditAction> {
    let mut actions = Vec::new();

    // Containers change structurally; unknown types have no editor form
    if !block.is_container() && block.block_type().is_some() {
        actions.push(EditAction::Update);
    }
    actions.push(EditAction::ToggleVisibility);
    actions.push(EditAction::InsertAfter);
    if block.is_container() {
        actions.push(EditAction::InsertInside);
    }
    actions.push(EditAction::Wrap);
    actions.push(EditAction::Duplicate);
    if validate::protected_in(block).is_none() {
        actions.push(EditAction::Remove);
    }

    actions
}

#[derive(Default)]
pub struct EditorView {
    frames: Vec<Vec<EditableNode>>,
}

impl EditorView {
    pub fn build(doc: &BlockList) -> Vec<EditableNode> {
        let mut view = EditorView {
            frames: vec![Vec::new()],
        };
        view.visit_document(doc);
        view.frames.pop().unwrap_or_default()
    }

    /// Node with `id` in an already built view
    pub fn find<'a>(nodes: &'a [EditableNode], id: &str) -> Option<&'a EditableNode> {
        nodes
            .iter()
            .flat_map(EditableNode::iter)
            .find(|node| node.id == id)
    }

    fn push(&mut self, node: EditableNode) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(node);
        }
    }
}

impl BlockVisitor for EditorView {
    fn visit_container(&mut self, block: &Arc<Block>, children: &BlockList) {
        self.frames.push(Vec::new());
        walk_children(self, children);
        let children = self.frames.pop().unwrap_or_default();
        self.push(EditableNode::new(block, children));
    }

    fn visit_leaf(&mut self, block: &Arc<Block>) {
        self.push(EditableNode::new(block, Vec::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagekit_blocks::TextProps;
    use serde_json::json;

    fn doc() -> BlockList {
        serde_json::from_value(json!([
            { "id": "hero", "type": "group", "properties": { "blocks": [
                { "id": "title", "type": "elegant-title", "original": true },
                { "id": "hidden", "type": "text", "visible": false }
            ] } },
            { "id": "map", "type": "map", "properties": { "zoom": 3 } }
        ]))
        .unwrap()
    }

    #[test]
    fn test_hidden_nodes_are_shown() {
        let nodes = EditorView::build(&doc());
        let hidden = EditorView::find(&nodes, "hidden").unwrap();
        assert!(!hidden.visible);
        assert_eq!(
            hidden.toggle_visibility(),
            Mutation::SetVisible {
                id: "hidden".to_string(),
                visible: true
            }
        );
    }

    #[test]
    fn test_protected_content_cannot_be_removed() {
        let nodes = EditorView::build(&doc());

        let title = EditorView::find(&nodes, "title").unwrap();
        assert!(title.protected);
        assert!(title.remove().is_none());

        // Nor can the group around it
        assert!(nodes[0].remove().is_none());
    }

    #[test]
    fn test_insert_inside_only_on_containers() {
        let nodes = EditorView::build(&doc());

        assert!(nodes[0].insert_inside(BlockType::Text).is_some());
        let title = EditorView::find(&nodes, "title").unwrap();
        assert!(title.insert_inside(BlockType::Text).is_none());
        assert!(!title.allows(EditAction::InsertInside));
    }

    #[test]
    fn test_unknown_types_render_placeholder() {
        let nodes = EditorView::build(&doc());
        let map = &nodes[1];

        assert_eq!(
            map.content,
            Content::Placeholder {
                block_type: "map".to_string()
            }
        );
        assert!(!map.allows(EditAction::Update));
        let remove = Mutation::RemoveBlock {
            id: "map".to_string(),
        };
        assert_eq!(map.remove(), Some(remove));
    }

    #[test]
    fn test_update_action() {
        let nodes = EditorView::build(&doc());
        let hidden = EditorView::find(&nodes, "hidden").unwrap();
        let properties = Properties::Text(TextProps::new("now visible"));

        assert!(hidden.update(properties.clone()).is_some());
        assert!(nodes[0].update(properties).is_none());
        assert!(hidden.wrap(BlockType::Image).is_none());
    }

    #[test]
    fn test_iter_is_document_order() {
        let nodes = EditorView::build(&doc());
        let ids: Vec<&str> = nodes[0].iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["hero", "title", "hidden"]);
    }
}
