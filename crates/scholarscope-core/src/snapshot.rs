use std::sync::Arc;

use crate::model::Report;
use crate::store::SlotStore;

/// Slot holding the serialized current report.
pub const SNAPSHOT_SLOT: &str = "current_report";

/// Single-slot, session-scoped copy of the last fetched report.
///
/// Never authoritative: every failure degrades to "no snapshot".
#[derive(Clone)]
pub struct ReportSnapshotCache {
    store: Arc<dyn SlotStore>,
}

impl ReportSnapshotCache {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Overwrite the snapshot. Failures are logged and dropped.
    pub fn save(&self, report: &Report) {
        let json = match serde_json::to_string(report) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize report snapshot");
                return;
            }
        };
        if let Err(e) = self.store.write(SNAPSHOT_SLOT, &json) {
            tracing::warn!(error = %e, "failed to write report snapshot");
        }
    }

    /// Load the snapshot, or `None` if absent or unparseable.
    pub fn load(&self) -> Option<Report> {
        let raw = match self.store.read(SNAPSHOT_SLOT) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read report snapshot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt report snapshot");
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(SNAPSHOT_SLOT) {
            tracing::warn!(error = %e, "failed to clear report snapshot");
        }
    }
}
