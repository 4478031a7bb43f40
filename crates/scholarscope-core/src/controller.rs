//! Report lifecycle: submit a locator, animate progress while the service
//! works, then commit the result (or the failure).
//!
//! The controller is driven from a single event loop. Background tasks (the
//! request itself, the progress ticker and the settle timer) never touch
//! state; they only send [`ControllerEvent`]s, which the owner feeds back into
//! [`ReportController::handle_event`]. Every event carries the generation of
//! the submit that spawned it, so anything belonging to a superseded request
//! is dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::CoreError;
use crate::client::{AnalysisClient, AnalysisError};
use crate::history::{HistoryStore, MAX_RATING};
use crate::model::{HistoryEntry, Report};
use crate::snapshot::ReportSnapshotCache;

/// Period of the simulated progress tick.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Pause between "100%" and showing the report.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Simulated progress never passes this on its own.
pub const PROGRESS_CEILING: f64 = 90.0;

/// Below this, progress moves in fast steps.
pub const FAST_PHASE_LIMIT: f64 = 60.0;

const FAST_STEP: f64 = 2.0;
const SLOW_STEP: f64 = 0.5;

/// One tick of simulated progress.
pub fn advance_progress(progress: f64) -> f64 {
    let step = if progress < FAST_PHASE_LIMIT {
        FAST_STEP
    } else {
        SLOW_STEP
    };
    (progress + step).min(PROGRESS_CEILING)
}

/// Messages from background tasks back to the controller's owner.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// Progress ticker fired.
    Tick { generation: u64 },
    /// The analysis request finished.
    Fetched {
        generation: u64,
        result: Result<Report, AnalysisError>,
    },
    /// The settle delay after a successful fetch has elapsed.
    Settled { generation: u64 },
}

impl ControllerEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Tick { generation }
            | Self::Fetched { generation, .. }
            | Self::Settled { generation } => *generation,
        }
    }
}

/// Where the controller is in the request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight.
    Idle,
    /// Request outstanding, ticker running.
    Pending,
    /// Response received, progress pinned at 100, waiting to commit.
    Settling,
}

/// State of the "save to history" dialog for the current report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveDraft {
    pub modal_open: bool,
    /// 0 = not yet rated.
    pub rating: u8,
    pub comment: String,
    /// The current report has been saved since it was fetched.
    pub saved: bool,
}

pub struct ReportController {
    client: Arc<dyn AnalysisClient>,
    snapshot: ReportSnapshotCache,
    events: mpsc::UnboundedSender<ControllerEvent>,

    generation: u64,
    phase: Phase,
    progress: f64,
    locator: Option<String>,
    current_report: Option<Report>,
    /// Report received but not yet committed (phase == Settling).
    settling: Option<Report>,
    last_error: Option<AnalysisError>,
    draft: SaveDraft,

    // Background tasks for the current generation; dropping a guard cancels
    // its task.
    request: Option<DropGuard>,
    ticker: Option<DropGuard>,
    settle_timer: Option<DropGuard>,
}

impl ReportController {
    /// Build a controller, restoring any snapshot without issuing a request.
    ///
    /// Returns the receiver the owner must drain into [`handle_event`](Self::handle_event).
    pub fn new(
        client: Arc<dyn AnalysisClient>,
        snapshot: ReportSnapshotCache,
    ) -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let current_report = snapshot.load();
        if let Some(ref report) = current_report {
            tracing::info!(id = %report.profile.id, "restored report snapshot");
        }
        let controller = Self {
            client,
            snapshot,
            events,
            generation: 0,
            phase: Phase::Idle,
            progress: 0.0,
            locator: None,
            current_report,
            settling: None,
            last_error: None,
            draft: SaveDraft::default(),
            request: None,
            ticker: None,
            settle_timer: None,
        };
        (controller, rx)
    }

    /// Start analysing `identifier`.
    ///
    /// Returns `false` without doing anything if the identifier is blank or a
    /// request is already pending. Must be called inside a tokio runtime.
    pub fn submit(&mut self, identifier: &str) -> bool {
        let locator = identifier.trim();
        if locator.is_empty() {
            return false;
        }
        if self.is_pending() {
            tracing::debug!(locator, "submit ignored: request already pending");
            return false;
        }

        // Supersede whatever was settling from the previous generation.
        self.stop_tasks();
        self.generation += 1;
        let generation = self.generation;

        self.phase = Phase::Pending;
        self.progress = 0.0;
        self.current_report = None;
        self.settling = None;
        self.last_error = None;
        self.locator = Some(locator.to_string());

        self.request = Some(self.spawn_request(generation, locator.to_string()));
        self.ticker = Some(spawn_ticker(generation, self.events.clone()));
        tracing::info!(generation, locator, "analysis submitted");
        true
    }

    /// Apply an event from a background task. Returns `true` if it changed
    /// state, `false` if it was stale or out of phase.
    pub fn handle_event(&mut self, event: ControllerEvent) -> bool {
        if event.generation() != self.generation {
            tracing::debug!(
                stale = event.generation(),
                current = self.generation,
                "dropping event from superseded request"
            );
            return false;
        }

        match event {
            ControllerEvent::Tick { .. } => {
                if self.phase != Phase::Pending {
                    return false;
                }
                self.progress = advance_progress(self.progress);
                true
            }
            ControllerEvent::Fetched { result, generation } => {
                if self.phase != Phase::Pending {
                    return false;
                }
                self.ticker = None;
                self.request = None;
                match result {
                    Ok(report) => {
                        tracing::debug!(generation, id = %report.profile.id, "analysis succeeded, settling");
                        self.phase = Phase::Settling;
                        self.progress = 100.0;
                        self.settling = Some(report);
                        self.settle_timer = Some(spawn_settle_timer(generation, self.events.clone()));
                    }
                    Err(e) => {
                        tracing::warn!(generation, error = %e, "analysis failed");
                        self.phase = Phase::Idle;
                        self.progress = 0.0;
                        self.last_error = Some(e);
                    }
                }
                true
            }
            ControllerEvent::Settled { generation } => {
                if self.phase != Phase::Settling {
                    return false;
                }
                self.settle_timer = None;
                let Some(report) = self.settling.take() else {
                    return false;
                };
                self.snapshot.save(&report);
                tracing::info!(
                    generation,
                    id = %report.profile.id,
                    papers = report.papers.len(),
                    "report committed"
                );
                self.current_report = Some(report);
                self.progress = 0.0;
                self.phase = Phase::Idle;
                self.draft = SaveDraft::default();
                true
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    /// Visible progress, 0..=100.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn current_report(&self) -> Option<&Report> {
        self.current_report.as_ref()
    }

    pub fn last_error(&self) -> Option<&AnalysisError> {
        self.last_error.as_ref()
    }

    /// Locator of the most recent accepted submit.
    pub fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn draft(&self) -> &SaveDraft {
        &self.draft
    }

    /// Open the save dialog. No-op without a report or once it is saved.
    pub fn open_save(&mut self) -> bool {
        if self.current_report.is_none() || self.draft.saved {
            return false;
        }
        self.draft.modal_open = true;
        true
    }

    pub fn cancel_save(&mut self) {
        self.draft.modal_open = false;
    }

    pub fn set_rating(&mut self, rating: u8) {
        self.draft.rating = rating.min(MAX_RATING);
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.draft.comment = comment.into();
    }

    pub fn comment_mut(&mut self) -> &mut String {
        &mut self.draft.comment
    }

    /// Persist the current report with the draft's rating and comment.
    pub fn confirm_save(&mut self, history: &HistoryStore) -> Result<HistoryEntry, CoreError> {
        let report = self.current_report.as_ref().ok_or(CoreError::NoReport)?;
        let entry = history.save_report(report, self.draft.rating, &self.draft.comment)?;
        self.draft.modal_open = false;
        self.draft.saved = true;
        Ok(entry)
    }

    fn stop_tasks(&mut self) {
        self.request = None;
        self.ticker = None;
        self.settle_timer = None;
    }

    fn spawn_request(&self, generation: u64, locator: String) -> DropGuard {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let client = Arc::clone(&self.client);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = client.analyze(&locator) => result,
            };
            // Receiver gone means the owner shut down.
            let _ = tx.send(ControllerEvent::Fetched { generation, result });
        });
        cancel.drop_guard()
    }
}

impl Drop for ReportController {
    fn drop(&mut self) {
        self.stop_tasks();
    }
}

/// Periodic progress ticks until the returned guard is dropped.
fn spawn_ticker(generation: u64, tx: mpsc::UnboundedSender<ControllerEvent>) -> DropGuard {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + TICK_PERIOD;
        let mut interval = tokio::time::interval_at(start, TICK_PERIOD);
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    if tx.send(ControllerEvent::Tick { generation }).is_err() {
                        break;
                    }
                }
            }
        }
    });
    cancel.drop_guard()
}

fn spawn_settle_timer(generation: u64, tx: mpsc::UnboundedSender<ControllerEvent>) -> DropGuard {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(SETTLE_DELAY) => {
                let _ = tx.send(ControllerEvent::Settled { generation });
            }
        }
    });
    cancel.drop_guard()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAnalysis, MockResponse};
    use crate::model::{Metrics, Profile};
    use crate::store::MemorySlotStore;

    fn report(id: &str) -> Report {
        Report {
            profile: Profile {
                id: id.into(),
                name: format!("Scholar {id}"),
                affiliations: None,
                academic_age: 5,
            },
            metrics: Metrics {
                total_c: 42.0,
                h_index: 3.0,
                ..Metrics::default()
            },
            papers: vec![],
        }
    }

    fn controller(
        mock: MockAnalysis,
    ) -> (ReportController, mpsc::UnboundedReceiver<ControllerEvent>) {
        let snapshot = ReportSnapshotCache::new(Arc::new(MemorySlotStore::new()));
        ReportController::new(Arc::new(mock), snapshot)
    }

    async fn run_until_idle(
        ctrl: &mut ReportController,
        rx: &mut mpsc::UnboundedReceiver<ControllerEvent>,
    ) {
        while ctrl.phase() != Phase::Idle {
            let event = rx.recv().await.expect("channel open");
            ctrl.handle_event(event);
        }
    }

    #[test]
    fn progress_steps_fast_then_slow_and_caps() {
        assert_eq!(advance_progress(0.0), 2.0);
        assert_eq!(advance_progress(58.0), 60.0);
        assert_eq!(advance_progress(60.0), 60.5);
        assert_eq!(advance_progress(89.8), 90.0);
        assert_eq!(advance_progress(90.0), 90.0);

        let mut p = 0.0;
        for _ in 0..10_000 {
            p = advance_progress(p);
        }
        assert_eq!(p, PROGRESS_CEILING);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_identifier_is_rejected() {
        let (mut ctrl, _rx) = controller(MockAnalysis::new(MockResponse::report(report("A"))));
        assert!(!ctrl.submit(""));
        assert!(!ctrl.submit("   \t"));
        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ctrl.generation(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_while_pending_is_rejected() {
        let mock = MockAnalysis::new(MockResponse::report(report("A")))
            .with_delay(Duration::from_secs(5));
        let (mut ctrl, _rx) = controller(mock);
        assert!(ctrl.submit("user=A"));
        assert!(!ctrl.submit("user=B"));
        assert_eq!(ctrl.locator(), Some("user=A"));
        assert_eq!(ctrl.generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_commits_report_and_resets_progress() {
        let mock = MockAnalysis::new(MockResponse::report(report("A")))
            .with_delay(Duration::from_millis(950));
        let (mut ctrl, mut rx) = controller(mock);
        assert!(ctrl.submit("user=A"));
        assert!(ctrl.is_pending());

        let mut saw_hundred = false;
        while ctrl.phase() != Phase::Idle {
            let event = rx.recv().await.unwrap();
            ctrl.handle_event(event);
            if ctrl.phase() == Phase::Settling {
                assert_eq!(ctrl.progress(), 100.0);
                assert!(ctrl.current_report().is_none());
                saw_hundred = true;
            }
        }
        assert!(saw_hundred);
        assert_eq!(ctrl.progress(), 0.0);
        assert_eq!(ctrl.current_report().unwrap().profile.id, "A");
    }

    #[tokio::test(start_paused = true)]
    async fn failure_surfaces_error_and_keeps_report_empty() {
        let mock = MockAnalysis::new(
            MockResponse::Error(AnalysisError::Status {
                status: 500,
                detail: "scrape failed".into(),
            })
            .after(Duration::from_millis(300)),
        );
        let (mut ctrl, mut rx) = controller(mock);
        ctrl.submit("user=A");
        run_until_idle(&mut ctrl, &mut rx).await;
        assert_eq!(ctrl.progress(), 0.0);
        assert!(ctrl.current_report().is_none());
        assert!(matches!(
            ctrl.last_error(),
            Some(AnalysisError::Status { status: 500, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn new_submit_clears_previous_error() {
        let mock = MockAnalysis::with_sequence(vec![
            MockResponse::Error(AnalysisError::Timeout),
            MockResponse::report(report("B")),
        ]);
        let (mut ctrl, mut rx) = controller(mock);
        ctrl.submit("user=A");
        run_until_idle(&mut ctrl, &mut rx).await;
        assert_eq!(ctrl.last_error(), Some(&AnalysisError::Timeout));

        ctrl.submit("user=B");
        assert!(ctrl.last_error().is_none());
        run_until_idle(&mut ctrl, &mut rx).await;
        assert_eq!(ctrl.current_report().unwrap().profile.id, "B");
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_stop_once_request_settles() {
        let mock = MockAnalysis::new(MockResponse::report(report("A")))
            .with_delay(Duration::from_millis(350));
        let (mut ctrl, mut rx) = controller(mock);
        ctrl.submit("user=A");
        run_until_idle(&mut ctrl, &mut rx).await;

        // Long after the settle, no further ticks may arrive or apply.
        tokio::time::sleep(Duration::from_secs(2)).await;
        while let Ok(event) = rx.try_recv() {
            assert!(!ctrl.handle_event(event));
        }
        assert_eq!(ctrl.progress(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_settle_is_ignored() {
        // First request resolves quickly; while it settles, a second submit
        // supersedes it. Only the second report may ever be committed.
        let mock = MockAnalysis::with_sequence(vec![
            MockResponse::report(report("OLD")).after(Duration::from_millis(100)),
            MockResponse::report(report("NEW")).after(Duration::from_millis(700)),
        ]);
        let (mut ctrl, mut rx) = controller(mock);
        ctrl.submit("user=OLD");
        while ctrl.phase() != Phase::Settling {
            let event = rx.recv().await.unwrap();
            ctrl.handle_event(event);
        }
        assert!(ctrl.submit("user=NEW"));
        assert_eq!(ctrl.generation(), 2);

        let mut committed = Vec::new();
        while ctrl.phase() != Phase::Idle {
            let event = rx.recv().await.unwrap();
            ctrl.handle_event(event);
            if let Some(r) = ctrl.current_report() {
                committed.push(r.profile.id.clone());
            }
        }
        assert_eq!(committed, vec!["NEW".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_fetched_event_is_dropped() {
        let (mut ctrl, _rx) = controller(
            MockAnalysis::new(MockResponse::report(report("A")))
                .with_delay(Duration::from_secs(60)),
        );
        ctrl.submit("user=A");
        let stale = ControllerEvent::Fetched {
            generation: 0,
            result: Ok(report("GHOST")),
        };
        assert!(!ctrl.handle_event(stale));
        assert!(ctrl.is_pending());
        assert!(ctrl.current_report().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_is_restored_without_request() {
        let store = Arc::new(MemorySlotStore::new());
        let snapshot = ReportSnapshotCache::new(store.clone());
        snapshot.save(&report("CACHED"));

        let mock = Arc::new(MockAnalysis::new(MockResponse::report(report("X"))));
        let (ctrl, _rx) = ReportController::new(mock.clone(), ReportSnapshotCache::new(store));
        assert_eq!(ctrl.current_report().unwrap().profile.id, "CACHED");
        assert!(!ctrl.is_pending());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn commit_writes_snapshot() {
        let store = Arc::new(MemorySlotStore::new());
        let mock = MockAnalysis::new(MockResponse::report(report("A")));
        let (mut ctrl, mut rx) =
            ReportController::new(Arc::new(mock), ReportSnapshotCache::new(store.clone()));
        ctrl.submit("user=A");
        run_until_idle(&mut ctrl, &mut rx).await;
        let restored = ReportSnapshotCache::new(store).load().unwrap();
        assert_eq!(restored.profile.id, "A");
    }

    #[tokio::test(start_paused = true)]
    async fn save_draft_resets_when_new_report_commits() {
        let history = HistoryStore::new(Arc::new(MemorySlotStore::new()));
        let mock = MockAnalysis::with_sequence(vec![
            MockResponse::report(report("A")),
            MockResponse::report(report("B")),
        ]);
        let (mut ctrl, mut rx) = controller(mock);
        ctrl.submit("user=A");
        run_until_idle(&mut ctrl, &mut rx).await;

        assert!(ctrl.open_save());
        ctrl.set_rating(4);
        ctrl.set_comment("keep");
        ctrl.confirm_save(&history).unwrap();
        assert!(ctrl.draft().saved);
        assert!(!ctrl.open_save());

        ctrl.submit("user=B");
        run_until_idle(&mut ctrl, &mut rx).await;
        assert_eq!(ctrl.draft(), &SaveDraft::default());
    }

    #[tokio::test(start_paused = true)]
    async fn confirm_save_without_report_fails() {
        let history = HistoryStore::new(Arc::new(MemorySlotStore::new()));
        let (mut ctrl, _rx) = controller(MockAnalysis::new(MockResponse::report(report("A"))));
        assert!(!ctrl.open_save());
        assert!(matches!(ctrl.confirm_save(&history), Err(CoreError::NoReport)));
        assert!(history.list().is_empty());
    }
}
