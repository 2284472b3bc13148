//! # Pagekit Blocks
//!
//! Block-tree document model for event and template pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: closed block types + factory      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ block: Block / Properties / BlockList       │
//! │  - tagged union over block types            │
//! │  - Arc-shared nodes, lossless JSON          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ tree: pure structural mutations             │
//! │  - find / replace / insert / remove / wrap  │
//! │  - path copying, untouched subtrees shared  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pagekit_blocks::{tree, BlockList, BlockRegistry, BlockType, InsertMode};
//!
//! let mut registry = BlockRegistry::sequential("page");
//! let group = registry.create(BlockType::Group);
//! let text = registry.create(BlockType::Text);
//! let (group_id, text_id) = (group.id.clone(), text.id.clone());
//!
//! let doc = tree::append(&BlockList::new(), group);
//! let doc = tree::insert(&doc, &group_id, text, InsertMode::inside());
//! assert_eq!(tree::parent_of(&doc, &text_id).unwrap().id, group_id);
//!
//! let doc = tree::remove(&doc, &group_id);
//! assert!(doc.is_empty());
//! ```

mod block;
mod error;
mod id_generator;
mod properties;
mod registry;

pub mod tree;
pub mod validate;

pub use block::{Block, BlockList, Document};
pub use error::{BlockError, BlockResult};
pub use id_generator::IdGenerator;
pub use properties::{
    ContainerProps, CountdownProps, ElegantTitleProps, GalleryProps, GradientTitleProps,
    ImageProps, LinkProps, LinkTarget, Payload, Properties, RsvpProps, TextProps, TextQueryProps,
    TimelineItem, TimelineProps,
};
pub use registry::{BlockRegistry, BlockType, CatalogEntry};
pub use tree::{InsertMode, Position};
