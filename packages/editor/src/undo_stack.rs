//! # Undo/Redo Stack
//!
//! Snapshot history of committed documents.
//!
//! ## Design
//!
//! - Each commit records the document it replaced
//! - Undo swaps the current document with the most recent snapshot and moves
//!   the current one to the redo stack
//! - Redo does the reverse
//! - New commits clear the redo stack
//! - Supports batches (several commits undone as one step)
//!
//! Documents share every untouched subtree, so a snapshot costs roughly the
//! nodes on the edited path, not a full copy.

use pagekit_blocks::BlockList;

/// Document state before a commit
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: BlockList,

    /// Optional description of the change that replaced this state
    pub description: Option<String>,
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Snapshots before each commit (most recent last)
    undo_stack: Vec<Snapshot>,

    /// Snapshots undone (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Open batch; holds the state before its first commit once there is one
    current_batch: Option<Option<Snapshot>>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record `previous` as the state replaced by a commit
    pub fn record(&mut self, previous: BlockList, description: Option<String>) {
        let snapshot = Snapshot {
            document: previous,
            description,
        };

        match &mut self.current_batch {
            Some(batch @ None) => *batch = Some(snapshot),
            Some(Some(_)) => {}
            None => self.push(snapshot),
        }
    }

    /// Start a batch: commits until `end_batch` undo as one step
    pub fn begin_batch(&mut self) {
        if self.current_batch.is_none() {
            self.current_batch = Some(None);
        }
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(Some(snapshot)) = self.current_batch.take() {
            self.push(snapshot);
        }
    }

    /// Set description for the current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(Some(snapshot)) = &mut self.current_batch {
            snapshot.description = Some(description.into());
        }
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the redo branch
        self.redo_stack.clear();
    }

    /// Step back from `current`; `None` when there is nothing to undo
    pub fn undo(&mut self, current: BlockList) -> Option<BlockList> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(Snapshot {
            document: current,
            description: snapshot.description.clone(),
        });
        Some(snapshot.document)
    }

    /// Step forward from `current`; `None` when there is nothing to redo
    pub fn redo(&mut self, current: BlockList) -> Option<BlockList> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(Snapshot {
            document: current,
            description: snapshot.description.clone(),
        });
        Some(snapshot.document)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|s| s.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|s| s.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
