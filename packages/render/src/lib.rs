//! # Pagekit Render
//!
//! Read-only views over a page document.
//!
//! - [`EditorView`]: every node with the edit actions available for it
//! - [`PublicView`]: what visitors see, hidden nodes skipped and
//!   `text-query` placeholders filled
//!
//! Both walk the tree through [`BlockVisitor`] and show unknown block types
//! as [`Content::Placeholder`] instead of failing.

mod editor_view;
mod node;
mod public_view;
mod visitor;

pub use editor_view::{EditAction, EditableNode, EditorView};
pub use node::{Content, Direction, Presentation, RenderNode};
pub use public_view::{PublicView, QueryParams};
pub use visitor::{walk_block, walk_children, walk_document, BlockVisitor, TypeCounter};
