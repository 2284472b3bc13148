//! # Session Mutations
//!
//! Serializable command form of every edit session entry point. Editing UIs,
//! scripts and the async driver all speak this enum.
//!
//! ## Mutation Semantics
//!
//! ### Insert / Append / Add
//! - New nodes keep the ids they carry (`AddBlock` gets one from the registry)
//! - Inserted ids must be new to the document and unique within the inserted subtree
//! - A missing target is a no-op
//!
//! ### UpdateBlock
//! - Coalesced per block id, trailing-edge debounce
//! - Last write wins, intermediate values are discarded
//! - The block's type can never change
//!
//! ### RemoveBlock
//! - Removes node and all descendants
//! - Refused when the node or a descendant is protected (`original`)
//!
//! ### WrapBlock
//! - Replaces the node with a fresh container holding it as sole child
//!
//! ### MoveBlock
//! - Detaches the node and places it relative to the target, ids unchanged
//! - Moving a node into its own subtree is rejected
//!
//! ### DuplicateBlock
//! - Inserts a copy with fresh ids right after the node; copies are never protected
//! - Pending edits inside the node commit first
//!
//! ### SetVisible
//! - Hiding is allowed on protected nodes
//! - Setting the current value is a no-op
//!
//! ### SetBlocks
//! - Replaces the whole document as one undoable commit
//! - Documents with duplicate ids are rejected; pending edits are dropped
//!
//! ### Undo / Redo
//! - Pending edits commit first

use pagekit_blocks::{Block, BlockList, BlockType, InsertMode, Properties};
use serde::{Deserialize, Serialize};

/// Semantic edit commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Append an existing block at the root
    AppendBlock { block: Block },

    /// Create a block through the registry and place it
    AddBlock {
        block_type: BlockType,
        /// Root append when absent
        #[serde(default)]
        target_id: Option<String>,
        #[serde(default)]
        placement: InsertMode,
    },

    /// Insert an existing block relative to a target
    InsertBlock {
        target_id: String,
        block: Block,
        #[serde(default)]
        placement: InsertMode,
    },

    /// Remove a node and its subtree
    RemoveBlock { id: String },

    /// Wrap a node in a new container
    WrapBlock { id: String, wrapper: BlockType },

    /// Move a node relative to a target
    MoveBlock {
        id: String,
        target_id: String,
        #[serde(default)]
        placement: InsertMode,
    },

    /// Copy a subtree with fresh ids right after the original
    DuplicateBlock { id: String },

    /// Replace a leaf's properties (debounced)
    UpdateBlock { id: String, properties: Properties },

    /// Show or hide a node
    SetVisible { id: String, visible: bool },

    /// Replace the whole document
    SetBlocks { blocks: BlockList },

    Undo,

    Redo,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AppendBlock { .. } => "append_block",
            Mutation::AddBlock { .. } => "add_block",
            Mutation::InsertBlock { .. } => "insert_block",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::WrapBlock { .. } => "wrap_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::DuplicateBlock { .. } => "duplicate_block",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::SetVisible { .. } => "set_visible",
            Mutation::SetBlocks { .. } => "set_blocks",
            Mutation::Undo => "undo",
            Mutation::Redo => "redo",
        }
    }

    /// Id of the node the mutation addresses, if any
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::AddBlock { target_id, .. } => target_id.as_deref(),
            Mutation::InsertBlock { target_id, .. } => Some(target_id.as_str()),
            Mutation::RemoveBlock { id }
            | Mutation::WrapBlock { id, .. }
            | Mutation::MoveBlock { id, .. }
            | Mutation::DuplicateBlock { id }
            | Mutation::UpdateBlock { id, .. }
            | Mutation::SetVisible { id, .. } => Some(id.as_str()),
            Mutation::AppendBlock { .. }
            | Mutation::SetBlocks { .. }
            | Mutation::Undo
            | Mutation::Redo => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagekit_blocks::{Position, TextProps};
    use serde_json::json;

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateBlock {
            id: "text-123".to_string(),
            properties: Properties::Text(TextProps::new("Hello World")),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_script_form() {
        let mutation: Mutation = serde_json::from_value(json!({
            "op": "add_block",
            "block_type": "gradient-title",
            "target_id": "hero",
            "placement": { "mode": "inside", "position": "start" }
        }))
        .unwrap();

        assert_eq!(
            mutation,
            Mutation::AddBlock {
                block_type: BlockType::GradientTitle,
                target_id: Some("hero".to_string()),
                placement: InsertMode::Inside(Position::Start),
            }
        );
        assert_eq!(mutation.target_id(), Some("hero"));
    }

    #[test]
    fn test_placement_defaults_to_adjacent() {
        let mutation: Mutation = serde_json::from_value(json!({
            "op": "move_block",
            "id": "a",
            "target_id": "b"
        }))
        .unwrap();

        let Mutation::MoveBlock { placement, .. } = &mutation else {
            panic!("Expected move, got {:?}", mutation);
        };
        assert_eq!(*placement, InsertMode::Adjacent);
        assert_eq!(mutation.name(), "move_block");
    }

    #[test]
    fn test_unit_commands() {
        let undo: Mutation = serde_json::from_value(json!({ "op": "undo" })).unwrap();
        assert_eq!(undo, Mutation::Undo);
        assert_eq!(undo.target_id(), None);
    }
}
