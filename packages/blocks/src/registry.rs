//! # Block Type Registry
//!
//! The closed set of block types, their menu metadata, and the factory
//! that produces fresh block instances.

use crate::block::{Block, BlockList};
use crate::error::{BlockError, BlockResult};
use crate::id_generator::IdGenerator;
use crate::properties::Properties;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Every block type a page can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Text,
    TextQuery,
    Group,
    Row,
    Image,
    Link,
    Timeline,
    Countdown,
    Gallery,
    Rsvp,
    GradientTitle,
    ElegantTitle,
}

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Text,
        BlockType::TextQuery,
        BlockType::Group,
        BlockType::Row,
        BlockType::Image,
        BlockType::Link,
        BlockType::Timeline,
        BlockType::Countdown,
        BlockType::Gallery,
        BlockType::Rsvp,
        BlockType::GradientTitle,
        BlockType::ElegantTitle,
    ];

    /// Stored `type` tag
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::TextQuery => "text-query",
            BlockType::Group => "group",
            BlockType::Row => "row",
            BlockType::Image => "image",
            BlockType::Link => "link",
            BlockType::Timeline => "timeline",
            BlockType::Countdown => "countdown",
            BlockType::Gallery => "gallery",
            BlockType::Rsvp => "rsvp",
            BlockType::GradientTitle => "gradient-title",
            BlockType::ElegantTitle => "elegant-title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Text => "Text",
            BlockType::TextQuery => "Text from link",
            BlockType::Group => "Group",
            BlockType::Row => "Row",
            BlockType::Image => "Image",
            BlockType::Link => "Link",
            BlockType::Timeline => "Timeline",
            BlockType::Countdown => "Countdown",
            BlockType::Gallery => "Gallery",
            BlockType::Rsvp => "RSVP",
            BlockType::GradientTitle => "Gradient title",
            BlockType::ElegantTitle => "Elegant title",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BlockType::Text => "type",
            BlockType::TextQuery => "text-cursor-input",
            BlockType::Group => "box-select",
            BlockType::Row => "columns",
            BlockType::Image => "image",
            BlockType::Link => "link",
            BlockType::Timeline => "list-ordered",
            BlockType::Countdown => "timer",
            BlockType::Gallery => "images",
            BlockType::Rsvp => "mail-check",
            BlockType::GradientTitle => "heading",
            BlockType::ElegantTitle => "heading-1",
        }
    }

    /// Containers hold a nested block sequence
    pub fn is_container(&self) -> bool {
        matches!(self, BlockType::Group | BlockType::Row)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|block_type| block_type.as_str() == s)
            .ok_or_else(|| BlockError::UnknownBlockType(s.to_string()))
    }
}

/// Menu entry for block pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Factory for fresh blocks
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    ids: IdGenerator,
}

impl BlockRegistry {
    pub fn new(ids: IdGenerator) -> Self {
        Self { ids }
    }

    /// Registry producing `{seed}-{n}` ids
    pub fn sequential(seed: impl Into<String>) -> Self {
        Self::new(IdGenerator::sequential(seed))
    }

    /// Fresh block with default properties
    pub fn create(&mut self, block_type: BlockType) -> Block {
        Block::new(self.ids.new_id(), Properties::default_for(block_type))
    }

    /// Fresh block from a stored type tag
    pub fn create_tag(&mut self, tag: &str) -> BlockResult<Block> {
        let block_type = tag.parse()?;
        Ok(self.create(block_type))
    }

    /// Fresh protected block (template content that can only be hidden)
    pub fn create_original(&mut self, block_type: BlockType) -> Block {
        let mut block = self.create(block_type);
        block.original = true;
        block
    }

    /// Deep copy of `block` with a new id on every node
    ///
    /// Copies are never protected, even when the source was.
    pub fn duplicate(&mut self, block: &Block) -> Block {
        let mut copy = block.clone();
        copy.id = self.ids.new_id();
        copy.original = false;

        if let Some(children) = block.children() {
            let children: BlockList = children
                .iter()
                .map(|child| Arc::new(self.duplicate(child)))
                .collect();
            if let Some(container) = copy.with_children(children) {
                copy = container;
            }
        }

        copy
    }

    /// All block types with their labels and icons
    pub fn catalog() -> Vec<CatalogEntry> {
        BlockType::ALL
            .into_iter()
            .map(|block_type| CatalogEntry {
                block_type,
                label: block_type.label(),
                icon: block_type.icon(),
            })
            .collect()
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }
}
