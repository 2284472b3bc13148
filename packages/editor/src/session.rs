//! # Edit Session
//!
//! Owns the current page document and is its only mutator.
//!
//! Structural edits (insert, remove, wrap, move, ...) commit synchronously.
//! Property edits are buffered per block id and commit once their debounce
//! window passes without another edit for the same block. Every commit bumps
//! [`EditSession::version`] and records the replaced document for undo.
//!
//! Entry points addressed by id return `Ok(false)` (or `None`) when the id is
//! not in the document: stale ids are expected while a page reloads.

use crate::config::SessionConfig;
use crate::debounce::{PendingEdit, PendingEdits};
use crate::errors::EditorError;
use crate::mutations::Mutation;
use crate::undo_stack::UndoStack;
use pagekit_blocks::{
    tree, validate, Block, BlockError, BlockList, BlockRegistry, BlockType, InsertMode, Properties,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Single-user editing state for one page
pub struct EditSession {
    document: BlockList,
    version: u64,
    registry: BlockRegistry,
    pending: PendingEdits,
    history: UndoStack,
    config: SessionConfig,
}

impl EditSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_registry(config, BlockRegistry::default())
    }

    pub fn with_registry(config: SessionConfig, registry: BlockRegistry) -> Self {
        Self {
            document: BlockList::new(),
            version: 0,
            registry,
            pending: PendingEdits::new(config.debounce),
            history: UndoStack::with_max_levels(config.history_levels),
            config,
        }
    }

    /// Session over a freshly fetched document
    pub fn open(document: BlockList, config: SessionConfig) -> Self {
        let mut session = Self::new(config);
        session.load(document);
        session
    }

    pub fn document(&self) -> &BlockList {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Block>> {
        tree::find(&self.document, id)
    }

    // ------------------------------------------------------------------
    // Whole-document replacement
    // ------------------------------------------------------------------

    /// Start over from a document read from storage
    ///
    /// Pending edits and history belong to the previous document and are
    /// dropped.
    pub fn load(&mut self, document: BlockList) {
        info!(blocks = tree::count(&document), "Loading document");
        self.pending.clear();
        self.history.clear();
        self.document = document;
        self.version = 0;
    }

    /// Replace the whole document as one undoable commit
    pub fn set_blocks(&mut self, document: BlockList) -> bool {
        self.discard_pending();
        self.commit(document, "Replace document")
    }

    /// Replace the document from raw JSON (the raw editor escape hatch)
    ///
    /// Malformed input or duplicate ids leave the session untouched.
    pub fn set_blocks_json(&mut self, json: &str) -> Result<bool, EditorError> {
        let document: BlockList =
            serde_json::from_str(json).map_err(|e| EditorError::MalformedDocument(e.to_string()))?;
        validate::validate(&document).map_err(|e| EditorError::MalformedDocument(e.to_string()))?;
        Ok(self.set_blocks(document))
    }

    /// Current document as stored JSON, pending edits not included
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(&self.document)?)
    }

    /// Commit every pending edit and return the document to persist
    pub fn save_snapshot(&mut self) -> BlockList {
        self.flush();
        self.document.clone()
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    pub fn append_block(&mut self, block: Block) -> Result<bool, EditorError> {
        self.ensure_new_ids(&block)?;
        let next = tree::append(&self.document, block);
        Ok(self.commit(next, "Add block"))
    }

    pub fn insert_block(
        &mut self,
        target_id: &str,
        block: Block,
        placement: InsertMode,
    ) -> Result<bool, EditorError> {
        self.ensure_new_ids(&block)?;
        let next = tree::insert(&self.document, target_id, block, placement);
        Ok(self.commit(next, "Add block"))
    }

    /// Create a block of `block_type` and place it
    ///
    /// Appends at the root without a target. Returns the new id, or `None`
    /// when the target rejected it.
    pub fn add_block(
        &mut self,
        block_type: BlockType,
        target_id: Option<&str>,
        placement: InsertMode,
    ) -> Option<String> {
        let block = self.fresh_block(block_type);
        let id = block.id.clone();

        let next = match target_id {
            Some(target_id) => tree::insert(&self.document, target_id, block, placement),
            None => tree::append(&self.document, block),
        };

        self.commit(next, "Add block").then_some(id)
    }

    /// Remove a node and its subtree, unless protected content is in it
    pub fn remove_block(&mut self, id: &str) -> Result<bool, EditorError> {
        validate::check_removable(&self.document, id)?;
        let next = tree::remove(&self.document, id);
        Ok(self.commit(next, "Remove block"))
    }

    /// Wrap a node in a new `wrapper` container; returns the wrapper's id
    pub fn wrap_block(
        &mut self,
        id: &str,
        wrapper: BlockType,
    ) -> Result<Option<String>, EditorError> {
        if !wrapper.is_container() {
            return Err(BlockError::NotAContainer(wrapper.to_string()).into());
        }
        if !tree::contains(&self.document, id) {
            return Ok(None);
        }

        let shell = self.fresh_block(wrapper);
        let wrapper_id = shell.id.clone();
        let next = tree::wrap(&self.document, id, |child| {
            shell
                .with_children(BlockList::from_vec(vec![child]))
                .unwrap_or_else(|| shell.clone())
        });

        Ok(self.commit(next, "Wrap block").then_some(wrapper_id))
    }

    pub fn move_block(
        &mut self,
        id: &str,
        target_id: &str,
        placement: InsertMode,
    ) -> Result<bool, EditorError> {
        let next = tree::move_block(&self.document, id, target_id, placement)?;
        Ok(self.commit(next, "Move block"))
    }

    /// Copy a subtree with fresh ids right after the original
    ///
    /// Pending edits inside the subtree commit first so the copy carries them.
    pub fn duplicate_block(&mut self, id: &str) -> Option<String> {
        self.flush_subtree(id);
        let source = self.find(id)?.clone();
        let copy = self.fresh_copy(&source);
        let copy_id = copy.id.clone();

        let next = tree::insert(&self.document, id, copy, InsertMode::Adjacent);
        self.commit(next, "Duplicate block").then_some(copy_id)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        let Some(block) = self.find(id) else {
            return false;
        };
        if block.visible == visible {
            return false;
        }

        let replacement = block.with_visible(visible);
        let next = tree::find_and_replace(&self.document, id, replacement);
        self.commit(next, if visible { "Show block" } else { "Hide block" })
    }

    /// Replace a block's presentation metadata immediately
    ///
    /// Class, style, tag, animation, visibility and unmodelled keys come from
    /// `block`. Properties, children and the protected flag stay as they are:
    /// content changes go through [`update_block`](Self::update_block).
    pub fn replace_block(&mut self, block: Block) -> Result<bool, EditorError> {
        let Some(current) = self.find(&block.id) else {
            return Ok(false);
        };
        if current.type_tag() != block.type_tag() {
            let err = BlockError::type_mismatch(&block.id, current.type_tag(), block.type_tag());
            return Err(err.into());
        }

        let replacement = Block {
            properties: current.properties.clone(),
            original: current.original,
            ..block
        };
        if current.as_ref() == &replacement {
            return Ok(false);
        }

        let id = replacement.id.clone();
        let next = tree::find_and_replace(&self.document, &id, replacement);
        Ok(self.commit(next, "Edit block"))
    }

    // ------------------------------------------------------------------
    // Debounced property edits
    // ------------------------------------------------------------------

    /// Buffer new properties for a leaf block
    ///
    /// Returns `Ok(false)` when the block is not in the document. Commits
    /// happen later through [`flush_due`](Self::flush_due) or
    /// [`flush`](Self::flush).
    pub fn update_block(&mut self, id: &str, properties: Properties) -> Result<bool, EditorError> {
        self.update_block_at(id, properties, Instant::now())
    }

    pub fn update_block_at(
        &mut self,
        id: &str,
        properties: Properties,
        now: Instant,
    ) -> Result<bool, EditorError> {
        let Some(block) = self.find(id) else {
            return Ok(false);
        };

        // Reject edits that could never commit up front
        block.with_properties(properties.clone())?;

        let edit = self.pending.schedule(id, properties, now);
        debug!(block_id = %id, coalesced = edit.coalesced, "Scheduled property edit");
        Ok(true)
    }

    /// Commit pending edits whose window has passed; returns the commit count
    pub fn flush_due(&mut self, now: Instant) -> usize {
        let due = self.pending.take_due(now);
        self.commit_edits(due)
    }

    /// Commit every pending edit now
    pub fn flush(&mut self) -> usize {
        let all = self.pending.take_all();
        self.commit_edits(all)
    }

    /// Drop pending edits without committing them
    pub fn discard_pending(&mut self) {
        if !self.pending.is_empty() {
            debug!(count = self.pending.len(), "Discarding pending edits");
        }
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_edit(&self, id: &str) -> Option<&PendingEdit> {
        self.pending.get(id)
    }

    /// When the next pending edit becomes due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.next_deadline()
    }

    /// Commit pending edits for `id` and its descendants, due or not
    fn flush_subtree(&mut self, id: &str) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let Some(block) = self.find(id).cloned() else {
            return 0;
        };

        let edits = self.pending.take_for(subtree_ids(&block));
        self.commit_edits(edits)
    }

    fn commit_edits(&mut self, edits: Vec<PendingEdit>) -> usize {
        let mut commits = 0;

        for edit in edits {
            // The node may have moved or been wrapped since; it may also be gone
            let Some(block) = self.find(&edit.id) else {
                debug!(block_id = %edit.id, "Edited block no longer exists, dropping edit");
                continue;
            };

            let replacement = match block.with_properties(edit.properties) {
                Ok(replacement) => replacement,
                Err(e) => {
                    warn!(block_id = %edit.id, error = %e, "Dropping pending edit");
                    continue;
                }
            };

            let next = tree::find_and_replace(&self.document, &edit.id, replacement);
            if self.commit(next, "Edit block") {
                commits += 1;
            }
        }

        commits
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Pending edits commit first, so undo reverts them as well
    pub fn undo(&mut self) -> bool {
        self.flush();
        match self.history.undo(self.document.clone()) {
            Some(previous) => {
                self.document = previous;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.flush();
        match self.history.redo(self.document.clone()) {
            Some(next) => {
                self.document = next;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Run `edits` as one undo step
    pub fn batch<T>(&mut self, description: &str, edits: impl FnOnce(&mut Self) -> T) -> T {
        self.history.begin_batch();
        let result = edits(self);
        self.history.set_batch_description(description);
        self.history.end_batch();
        result
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply a command; `Ok(false)` means nothing changed (or nothing was
    /// scheduled)
    pub fn apply(&mut self, mutation: Mutation) -> Result<bool, EditorError> {
        self.apply_at(mutation, Instant::now())
    }

    #[instrument(
        skip(self, mutation, now),
        fields(op = mutation.name(), target = mutation.target_id())
    )]
    pub fn apply_at(&mut self, mutation: Mutation, now: Instant) -> Result<bool, EditorError> {
        match mutation {
            Mutation::AppendBlock { block } => self.append_block(block),
            Mutation::AddBlock {
                block_type,
                target_id,
                placement,
            } => {
                let added = self.add_block(block_type, target_id.as_deref(), placement);
                Ok(added.is_some())
            }
            Mutation::InsertBlock {
                target_id,
                block,
                placement,
            } => self.insert_block(&target_id, block, placement),
            Mutation::RemoveBlock { id } => self.remove_block(&id),
            Mutation::WrapBlock { id, wrapper } => Ok(self.wrap_block(&id, wrapper)?.is_some()),
            Mutation::MoveBlock {
                id,
                target_id,
                placement,
            } => self.move_block(&id, &target_id, placement),
            Mutation::DuplicateBlock { id } => Ok(self.duplicate_block(&id).is_some()),
            Mutation::UpdateBlock { id, properties } => self.update_block_at(&id, properties, now),
            Mutation::SetVisible { id, visible } => Ok(self.set_visible(&id, visible)),
            Mutation::SetBlocks { blocks } => {
                validate::validate(&blocks)?;
                Ok(self.set_blocks(blocks))
            }
            Mutation::Undo => Ok(self.undo()),
            Mutation::Redo => Ok(self.redo()),
        }
    }

    // ------------------------------------------------------------------

    /// Registry block whose id is not taken in the current document
    ///
    /// Sequential generators restart with every session, so a loaded
    /// document may already use the next id.
    fn fresh_block(&mut self, block_type: BlockType) -> Block {
        let mut block = self.registry.create(block_type);
        while tree::contains(&self.document, &block.id) {
            block.id = self.registry.ids_mut().new_id();
        }
        block
    }

    fn fresh_copy(&mut self, source: &Block) -> Block {
        loop {
            let copy = self.registry.duplicate(source);
            if self.ensure_new_ids(&copy).is_ok() {
                return copy;
            }
        }
    }

    /// Ids in `block`'s subtree must be unique among themselves and not yet
    /// used in the document
    fn ensure_new_ids(&self, block: &Block) -> Result<(), EditorError> {
        let mut seen = HashSet::new();
        for id in subtree_ids(block) {
            if !seen.insert(id) || tree::contains(&self.document, id) {
                return Err(BlockError::DuplicateId(id.to_string()).into());
            }
        }
        Ok(())
    }

    fn commit(&mut self, next: BlockList, description: &str) -> bool {
        if next.ptr_eq(&self.document) {
            return false;
        }

        let previous = std::mem::replace(&mut self.document, next);
        self.history.record(previous, Some(description.to_string()));
        self.version += 1;
        debug!(version = self.version, description, "Committed document");
        true
    }
}

/// `block`'s id followed by its descendants' ids in document order
fn subtree_ids(block: &Block) -> Vec<&str> {
    let mut ids = vec![block.id.as_str()];
    if let Some(children) = block.children() {
        ids.extend(tree::walk(children).map(|(_, child)| child.id.as_str()));
    }
    ids
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagekit_blocks::{Position, TextProps};
    use std::time::Duration;

    fn session() -> EditSession {
        EditSession::with_registry(SessionConfig::default(), BlockRegistry::sequential("s"))
    }

    fn append(session: &mut EditSession, block_type: BlockType) -> String {
        session
            .add_block(block_type, None, InsertMode::Adjacent)
            .unwrap()
    }

    fn text(content: &str) -> Properties {
        Properties::Text(TextProps::new(content))
    }

    #[test]
    fn test_session_creation() {
        let session = session();
        assert_eq!(session.version(), 0);
        assert_eq!(session.pending_count(), 0);
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_add_block_commits() {
        let mut session = session();
        let group = append(&mut session, BlockType::Group);
        let end = InsertMode::Inside(Position::End);
        let child = session
            .add_block(BlockType::Text, Some(&group), end)
            .unwrap();

        assert_eq!(session.version(), 2);
        let parent = tree::parent_of(session.document(), &child).unwrap();
        assert_eq!(parent.id, group);
    }

    #[test]
    fn test_add_inside_leaf_commits_nothing() {
        let mut session = session();
        let leaf = append(&mut session, BlockType::Text);

        let inside = session.add_block(BlockType::Image, Some(&leaf), InsertMode::inside());
        assert!(inside.is_none());
        assert_eq!(session.version(), 1);
    }

    #[test]
    fn test_update_validates_type() {
        let mut session = session();
        let id = append(&mut session, BlockType::Text);

        let rsvp = Properties::default_for(BlockType::Rsvp);
        let err = session.update_block(&id, rsvp).unwrap_err();
        assert!(matches!(
            err,
            EditorError::Block(BlockError::TypeMismatch { .. })
        ));
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut session = session();
        assert!(!session.update_block("missing", text("x")).unwrap());
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_pending_edit_follows_wrapped_block() {
        let mut session = session();
        let id = append(&mut session, BlockType::Text);
        let start = Instant::now();

        session.update_block_at(&id, text("typed"), start).unwrap();
        let wrapper = session.wrap_block(&id, BlockType::Row).unwrap().unwrap();

        assert_eq!(session.flush_due(start + Duration::from_millis(300)), 1);
        let parent = tree::parent_of(session.document(), &id).unwrap();
        assert_eq!(parent.id, wrapper);
        assert_eq!(session.find(&id).unwrap().properties, text("typed"));
    }

    #[test]
    fn test_wrap_rejects_leaf_wrapper() {
        let mut session = session();
        let id = append(&mut session, BlockType::Text);
        assert!(session.wrap_block(&id, BlockType::Image).is_err());
    }

    #[test]
    fn test_set_visible_toggles_once() {
        let mut session = session();
        let id = append(&mut session, BlockType::Gallery);

        assert!(!session.set_visible(&id, true));
        assert!(session.set_visible(&id, false));
        assert!(!session.find(&id).unwrap().visible);
    }

    #[test]
    fn test_replace_block_keeps_children() {
        let mut session = session();
        let group = append(&mut session, BlockType::Group);
        session.add_block(BlockType::Text, Some(&group), InsertMode::inside());

        let mut edited = Block::new(group.clone(), Properties::default_for(BlockType::Group));
        edited.class = Some("grid gap-4".to_string());

        assert!(session.replace_block(edited).unwrap());
        let current = session.find(&group).unwrap();
        assert_eq!(current.class.as_deref(), Some("grid gap-4"));
        assert_eq!(current.children().unwrap().len(), 1);
    }

    #[test]
    fn test_batch_is_one_undo_step() {
        let mut session = session();
        session.batch("Add section", |s| {
            let group = append(s, BlockType::Group);
            s.add_block(BlockType::Text, Some(&group), InsertMode::inside());
        });

        assert_eq!(session.history().undo_levels(), 1);
        assert!(session.undo());
        assert!(session.document().is_empty());
    }

    #[test]
    fn test_generated_ids_skip_existing_ones() {
        let mut session = session();
        session.load(BlockList::from(vec![Block::new("s-1", text("loaded"))]));

        let id = append(&mut session, BlockType::Text);
        assert_eq!(id, "s-2");

        let copy = session.duplicate_block("s-1").unwrap();
        assert_eq!(copy, "s-3");
    }
}
