//! Recent-conversion history: newest first, capped at [`HISTORY_LIMIT`].
//!
//! Reads never fail. A missing key, malformed JSON, or an unreachable backend
//! all load as an empty list so a broken store never blocks a conversion.

use anyhow::Result;
use log::{debug, warn};
use serde_json::Value;

use crate::models::HistoryEntry;
use crate::storage::{HISTORY_KEY, Storage};

pub const HISTORY_LIMIT: usize = 10;

pub struct HistoryStore<S: Storage> {
    storage: S,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Current list, newest first
    pub fn load(&self) -> Vec<HistoryEntry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("History unavailable, showing empty list: {:#}", e);
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<HistoryEntry>> {
        let Some(value) = self.storage.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };

        // Anything that isn't an array is treated like an absent list
        let Value::Array(items) = value else {
            warn!("Stored history is not a list, ignoring it");
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(items.len());
        let mut skipped = 0;
        for item in items {
            match serde_json::from_value::<HistoryEntry>(item) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    debug!("Skipping malformed history entry: {}", e);
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!("Skipped {} malformed history entries", skipped);
        }

        entries.truncate(HISTORY_LIMIT);
        Ok(entries)
    }

    /// Prepend `entry`, keep the newest [`HISTORY_LIMIT`], persist, and return the list
    pub fn append(&mut self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        let mut next = Vec::with_capacity(HISTORY_LIMIT);
        next.push(entry);
        next.extend(self.load());
        next.truncate(HISTORY_LIMIT);

        if let Err(e) = self.write(&next) {
            warn!("Failed to save history: {:#}", e);
        }
        next
    }

    /// Replace the persisted list with an empty one
    pub fn clear(&mut self) -> Vec<HistoryEntry> {
        if let Err(e) = self.write(&[]) {
            warn!("Failed to clear history: {:#}", e);
        }
        Vec::new()
    }

    fn write(&mut self, entries: &[HistoryEntry]) -> Result<()> {
        let value = serde_json::to_value(entries)?;
        self.storage.set(HISTORY_KEY, value)
    }
}
