//! End-to-end scenarios through the controller, stores and dataset view.
//!
//! Everything runs against [`MockAnalysis`] and in-memory stores on tokio's
//! paused clock, so progress ticks are deterministic and no HTTP is made.

use std::sync::Arc;
use std::time::Duration;

use scholarscope_core::controller::{PROGRESS_CEILING, Phase};
use scholarscope_core::dataset::{DatasetView, page_count, venue_options};
use scholarscope_core::mock::{MockAnalysis, MockResponse};
use scholarscope_core::{
    ControllerEvent, HistoryStore, MemorySlotStore, Metrics, Paper, Profile, Report,
    ReportController, ReportSnapshotCache,
};
use tokio::sync::mpsc::UnboundedReceiver;

const LOCATOR: &str = "scholar.google.com/citations?user=ABC";

fn report(id: &str, total_c: f64, h_index: f64) -> Report {
    Report {
        profile: Profile {
            id: id.into(),
            name: format!("Scholar {id}"),
            affiliations: Some("University of Somewhere".into()),
            academic_age: 11,
        },
        metrics: Metrics {
            total_c,
            total_p: 23.0,
            recent_c: total_c / 2.0,
            recent_p: 8.0,
            h_index,
            ..Metrics::default()
        },
        papers: vec![],
    }
}

fn paper(i: usize, venue: Option<&str>) -> Paper {
    Paper {
        title: format!("Paper {i}"),
        year: Some(2010 + (i % 12) as i32),
        venue: venue.map(String::from),
        rank: None,
        author_pos: None,
        citations: (i * 3) as u64,
    }
}

fn controller_with(
    mock: MockAnalysis,
) -> (ReportController, UnboundedReceiver<ControllerEvent>) {
    let snapshot = ReportSnapshotCache::new(Arc::new(MemorySlotStore::new()));
    ReportController::new(Arc::new(mock), snapshot)
}

async fn run_until_idle(ctrl: &mut ReportController, rx: &mut UnboundedReceiver<ControllerEvent>) {
    while ctrl.phase() != Phase::Idle {
        let event = rx.recv().await.expect("controller channel closed");
        ctrl.handle_event(event);
    }
}

#[tokio::test(start_paused = true)]
async fn scenario_a_progress_climbs_caps_then_completes() {
    let expected = report("ABC", 1520.0, 19.0);
    let mock = MockAnalysis::new(MockResponse::report(expected.clone()))
        .with_delay(Duration::from_secs(30));
    let (mut ctrl, mut rx) = controller_with(mock);

    assert!(ctrl.submit(LOCATOR));
    assert!(ctrl.is_pending());
    assert_eq!(ctrl.progress(), 0.0);

    let mut pending_samples = Vec::new();
    let mut visited_hundred = false;
    while ctrl.phase() != Phase::Idle {
        let event = rx.recv().await.unwrap();
        ctrl.handle_event(event);
        match ctrl.phase() {
            Phase::Pending => pending_samples.push(ctrl.progress()),
            Phase::Settling => {
                assert_eq!(ctrl.progress(), 100.0);
                visited_hundred = true;
            }
            Phase::Idle => {}
        }
    }

    assert!(pending_samples.windows(2).all(|w| w[0] <= w[1]));
    assert!(pending_samples.iter().all(|p| *p <= PROGRESS_CEILING));
    // 30s of ticks is far more than enough to reach the ceiling.
    assert_eq!(pending_samples.last().copied(), Some(PROGRESS_CEILING));
    assert!(visited_hundred);
    assert_eq!(ctrl.progress(), 0.0);
    assert_eq!(ctrl.current_report(), Some(&expected));
}

#[tokio::test(start_paused = true)]
async fn scenario_b_save_with_rating_and_comment() {
    let history = HistoryStore::new(Arc::new(MemorySlotStore::new()));
    let (mut ctrl, mut rx) = controller_with(MockAnalysis::new(MockResponse::report(report(
        "ABC", 1520.0, 19.0,
    ))));
    ctrl.submit(LOCATOR);
    run_until_idle(&mut ctrl, &mut rx).await;

    assert!(ctrl.open_save());
    ctrl.set_rating(4);
    ctrl.set_comment("strong h-index");
    ctrl.confirm_save(&history).unwrap();

    let list = history.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "ABC");
    assert_eq!(list[0].user_rating, 4);
    assert_eq!(list[0].user_comment, "strong h-index");
    assert_eq!(list[0].total_c, 1520.0);
    assert!(list[0].saved_at().is_some());
    assert!(ctrl.draft().saved);
    assert!(!ctrl.draft().modal_open);
}

#[tokio::test(start_paused = true)]
async fn scenario_c_resaving_same_id_replaces_and_moves_to_front() {
    let history = HistoryStore::new(Arc::new(MemorySlotStore::new()));
    let mock = MockAnalysis::with_sequence(vec![
        MockResponse::report(report("X", 100.0, 4.0)),
        MockResponse::report(report("Y", 50.0, 2.0)),
        MockResponse::report(report("X", 180.0, 6.0)),
    ]);
    let (mut ctrl, mut rx) = controller_with(mock);

    for (locator, rating) in [("user=X", 2), ("user=Y", 3), ("user=X", 5)] {
        ctrl.submit(locator);
        run_until_idle(&mut ctrl, &mut rx).await;
        ctrl.open_save();
        ctrl.set_rating(rating);
        ctrl.confirm_save(&history).unwrap();
    }

    let list = history.list();
    let ids: Vec<&str> = list.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["X", "Y"]);
    assert_eq!(list[0].total_c, 180.0);
    assert_eq!(list[0].h_index, 6.0);
    assert_eq!(list[0].user_rating, 5);
}

#[test]
fn scenario_d_pages_then_venue_filter_collapses() {
    let mut papers: Vec<Paper> = (0..18).map(|i| paper(i, Some("NeurIPS"))).collect();
    papers.extend((18..23).map(|i| paper(i, Some("TPAMI"))));
    assert_eq!(papers.len(), 23);

    let mut view = DatasetView::new();
    assert_eq!(page_count(papers.len()), 3);
    assert_eq!(view.page(&papers).items.len(), 10);
    view.next_page(&papers);
    assert_eq!(view.page(&papers).items.len(), 10);
    view.next_page(&papers);
    let last = view.page(&papers);
    assert_eq!(last.items.len(), 3);
    assert_eq!((last.start, last.end, last.total), (21, 23, 23));

    let tpami = venue_options(&papers)
        .into_iter()
        .find(|o| o.label == "TPAMI")
        .expect("TPAMI listed as quick filter");
    assert_eq!(tpami.count, 5);

    view.select_venue(tpami.venue);
    assert_eq!(view.current_page(), 1);
    let filtered = view.page(&papers);
    assert_eq!(filtered.page_count, 1);
    assert_eq!(filtered.items.len(), 5);
    assert!(!filtered.has_next());
    assert!(!filtered.shows_controls());
    assert!(filtered.items.iter().all(|p| p.venue.as_deref() == Some("TPAMI")));
}

#[tokio::test(start_paused = true)]
async fn failure_then_reload_keeps_last_committed_snapshot() {
    let store = Arc::new(MemorySlotStore::new());
    let mock = Arc::new(MockAnalysis::with_sequence(vec![
        MockResponse::report(report("A", 10.0, 1.0)),
        MockResponse::Error(scholarscope_core::AnalysisError::Transport(
            "connection refused".into(),
        )),
    ]));
    {
        let (mut ctrl, mut rx) =
            ReportController::new(mock.clone(), ReportSnapshotCache::new(store.clone()));
        ctrl.submit("user=A");
        run_until_idle(&mut ctrl, &mut rx).await;
        ctrl.submit("user=B");
        run_until_idle(&mut ctrl, &mut rx).await;
        assert!(ctrl.current_report().is_none());
        assert!(ctrl.last_error().is_some());
    }

    // A "reload" in the same session restores the last successful report.
    let (ctrl, _rx) = ReportController::new(mock.clone(), ReportSnapshotCache::new(store));
    assert_eq!(ctrl.current_report().unwrap().profile.id, "A");
    assert_eq!(mock.call_count(), 2);
    assert_eq!(mock.locators(), vec!["user=A".to_string(), "user=B".to_string()]);
}

#[test]
fn history_survives_restart_on_disk() {
    use scholarscope_core::FileSlotStore;

    let dir = tempfile::tempdir().unwrap();
    {
        let history = HistoryStore::new(Arc::new(FileSlotStore::open(dir.path()).unwrap()));
        history
            .save_report(&report("A", 10.0, 1.0), 3, "first")
            .unwrap();
        history
            .save_report(&report("B", 20.0, 2.0), 0, "")
            .unwrap();
        history.remove("A").unwrap();
        history
            .save_report(&report("C", 30.0, 3.0), 5, "third")
            .unwrap();
    }

    let reopened = HistoryStore::new(Arc::new(FileSlotStore::open(dir.path()).unwrap()));
    let ids: Vec<String> = reopened.list().into_iter().map(|h| h.id).collect();
    assert_eq!(ids, vec!["C".to_string(), "B".to_string()]);

    reopened.clear_all().unwrap();
    let again = HistoryStore::new(Arc::new(FileSlotStore::open(dir.path()).unwrap()));
    assert!(again.list().is_empty());
}
