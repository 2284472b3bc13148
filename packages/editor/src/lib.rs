//! # Pagekit Editor
//!
//! Edit session controller for block-tree pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: Block tree + pure tree mutations    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Load / replace / snapshot the document   │
//! │  - Structural edits commit immediately      │
//! │  - Property edits debounced per block id    │
//! │  - Snapshot undo/redo                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render: editor / public views               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Session is the only mutator**: views hold snapshots, never write
//! 2. **Committed state is immutable**: each commit is a new shared tree
//! 3. **Stale ids are no-ops**: edits for vanished blocks do nothing
//! 4. **Protected content stays**: `original` blocks can be hidden, not removed
//!
//! ## Usage
//!
//! ```rust
//! use pagekit_blocks::{BlockType, InsertMode, Properties, TextProps};
//! use pagekit_editor::{EditSession, SessionConfig};
//! use std::time::{Duration, Instant};
//!
//! let mut session = EditSession::new(SessionConfig::default());
//! let id = session.add_block(BlockType::Text, None, InsertMode::Adjacent).unwrap();
//!
//! let now = Instant::now();
//! let props = Properties::Text(TextProps::new("Hello"));
//! session.update_block_at(&id, props, now).unwrap();
//!
//! // Nothing commits until the window passes
//! assert_eq!(session.flush_due(now), 0);
//! assert_eq!(session.flush_due(now + Duration::from_millis(300)), 1);
//! ```
//!
//! With the `async` feature, [`driver::spawn`] runs a session on a tokio
//! task and commits due edits on its own.

mod config;
mod debounce;
mod errors;
mod mutations;
mod session;
mod undo_stack;

#[cfg(feature = "async")]
pub mod driver;

pub use config::{SessionConfig, DEFAULT_DEBOUNCE, DEFAULT_HISTORY_LEVELS};
pub use debounce::{PendingEdit, PendingEdits};
pub use errors::EditorError;
pub use mutations::Mutation;
pub use session::EditSession;
pub use undo_stack::{Snapshot, UndoStack};

#[cfg(feature = "async")]
pub use driver::SessionHandle;
