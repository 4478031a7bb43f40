//! Durable, cross-session list of saved report summaries.
//!
//! The whole list lives in one slot and every mutation is a read-modify-write
//! of that slot, serialized by [`HistoryStore`]'s lock. Invariant: at most one
//! entry per `id`, most recently saved first.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::CoreError;
use crate::model::{HistoryEntry, Report};
use crate::store::SlotStore;

/// Slot holding the serialized history list.
pub const HISTORY_SLOT: &str = "compare_history";

/// Highest star rating a user can give.
pub const MAX_RATING: u8 = 5;

impl HistoryEntry {
    /// Summarize `report` with the user's rating and comment. Only a fixed
    /// subset of the report survives. Ratings above [`MAX_RATING`] are clamped.
    pub fn from_report(report: &Report, rating: u8, comment: &str, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: report.profile.id.clone(),
            name: report.profile.name.clone(),
            total_c: report.metrics.total_c,
            h_index: report.metrics.h_index,
            affiliations: report.profile.affiliations.clone(),
            user_rating: rating.min(MAX_RATING),
            user_comment: comment.to_string(),
            date: saved_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parsed save timestamp, if the stored string is valid RFC 3339.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

/// Remove any entry sharing `entry.id`, then put `entry` first.
pub fn upsert_into(mut list: Vec<HistoryEntry>, entry: HistoryEntry) -> Vec<HistoryEntry> {
    list.retain(|h| h.id != entry.id);
    list.insert(0, entry);
    list
}

pub struct HistoryStore {
    store: Arc<dyn SlotStore>,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Current list in stored order. Empty if missing or unreadable.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_list()
    }

    /// Insert `entry` at the front, replacing any entry with the same id.
    pub fn upsert(&self, entry: HistoryEntry) -> Result<(), CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let id = entry.id.clone();
        let list = upsert_into(self.read_list(), entry);
        self.write_list(&list)?;
        tracing::info!(id, entries = list.len(), "history entry saved");
        Ok(())
    }

    /// Remove the entry for `id`. Returns `false` (and writes nothing) if
    /// there was no such entry.
    pub fn remove(&self, id: &str) -> Result<bool, CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut list = self.read_list();
        let before = list.len();
        list.retain(|h| h.id != id);
        if list.len() == before {
            return Ok(false);
        }
        self.write_list(&list)?;
        tracing::info!(id, entries = list.len(), "history entry removed");
        Ok(true)
    }

    /// Drop the whole list. Irreversible.
    pub fn clear_all(&self) -> Result<(), CoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.remove(HISTORY_SLOT)?;
        tracing::info!("history cleared");
        Ok(())
    }

    /// Build an entry from `report` and upsert it. Returns the stored entry.
    pub fn save_report(
        &self,
        report: &Report,
        rating: u8,
        comment: &str,
    ) -> Result<HistoryEntry, CoreError> {
        let entry = HistoryEntry::from_report(report, rating, comment, Utc::now());
        self.upsert(entry.clone())?;
        Ok(entry)
    }

    fn read_list(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.read(HISTORY_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "history payload is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_list(&self, list: &[HistoryEntry]) -> Result<(), CoreError> {
        let json = serde_json::to_string(list)?;
        self.store.write(HISTORY_SLOT, &json)
    }
}
