use thiserror::Error;

pub mod client;
pub mod config_file;
pub mod controller;
pub mod dataset;
pub mod history;
pub mod mock;
pub mod model;
pub mod snapshot;
pub mod store;

// Re-export for convenience
pub use client::{AnalysisClient, AnalysisError, HttpAnalysisClient};
pub use controller::{ControllerEvent, Phase, ReportController, SaveDraft};
pub use dataset::{DatasetView, Page, VenueOption};
pub use history::HistoryStore;
pub use model::{HistoryEntry, Metrics, Paper, Profile, Report};
pub use snapshot::ReportSnapshotCache;
pub use store::{FileSlotStore, MemorySlotStore, SlotStore};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not determine the {0} directory")]
    NoDirectory(&'static str),
    #[error("no report to save")]
    NoReport,
}
