//! # Property Edit Coalescing
//!
//! Trailing-edge debounce keyed by block id.
//!
//! - Each block id has at most one pending edit
//! - A new edit for the same id replaces the pending value and restarts its
//!   window (last write wins)
//! - Different ids have independent windows and commit independently
//!
//! Time is passed in explicitly, so the buffer has no timer of its own. The
//! owner asks for [`PendingEdits::next_deadline`] and drains due edits with
//! [`PendingEdits::take_due`].

use pagekit_blocks::Properties;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Edit waiting for its quiet period to elapse
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    /// Target block id
    pub id: String,

    /// Latest properties for the block
    pub properties: Properties,

    /// When the edit commits if nothing else arrives
    pub deadline: Instant,

    /// Number of edits folded into this one
    pub coalesced: u32,
}

#[derive(Debug)]
pub struct PendingEdits {
    window: Duration,
    edits: HashMap<String, PendingEdit>,
}

impl PendingEdits {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            edits: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Buffer `properties` for `id`, restarting its window at `now`
    pub fn schedule(&mut self, id: &str, properties: Properties, now: Instant) -> &PendingEdit {
        let deadline = now + self.window;

        match self.edits.entry(id.to_string()) {
            Entry::Occupied(entry) => {
                let edit = entry.into_mut();
                edit.properties = properties;
                edit.deadline = deadline;
                edit.coalesced += 1;
                edit
            }
            Entry::Vacant(entry) => entry.insert(PendingEdit {
                id: id.to_string(),
                properties,
                deadline,
                coalesced: 0,
            }),
        }
    }

    /// Remove and return every edit whose deadline is at or before `now`
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingEdit> {
        let due: Vec<String> = self
            .edits
            .values()
            .filter(|edit| edit.deadline <= now)
            .map(|edit| edit.id.clone())
            .collect();

        let mut taken: Vec<PendingEdit> =
            due.iter().filter_map(|id| self.edits.remove(id)).collect();
        sort_by_deadline(&mut taken);
        taken
    }

    /// Remove and return all edits regardless of their deadlines
    pub fn take_all(&mut self) -> Vec<PendingEdit> {
        let mut taken: Vec<PendingEdit> = self.edits.drain().map(|(_, edit)| edit).collect();
        sort_by_deadline(&mut taken);
        taken
    }

    /// Remove and return the edits for `ids`, due or not
    pub fn take_for<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Vec<PendingEdit> {
        let mut taken: Vec<PendingEdit> = ids
            .into_iter()
            .filter_map(|id| self.edits.remove(id))
            .collect();
        sort_by_deadline(&mut taken);
        taken
    }

    /// Earliest deadline among pending edits
    pub fn next_deadline(&self) -> Option<Instant> {
        self.edits.values().map(|edit| edit.deadline).min()
    }

    pub fn get(&self, id: &str) -> Option<&PendingEdit> {
        self.edits.get(id)
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

fn sort_by_deadline(edits: &mut [PendingEdit]) {
    edits.sort_by(|a, b| (a.deadline, &a.id).cmp(&(b.deadline, &b.id)));
}
