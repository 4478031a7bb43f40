//! Mock analysis client for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::{AnalysisClient, AnalysisError};
use crate::model::Report;

/// A configurable mock response for [`MockAnalysis`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Resolve with this report.
    Report(Box<Report>),
    /// Fail with this error.
    Error(AnalysisError),
    /// Wait, then behave like the inner response.
    Delayed(Duration, Box<MockResponse>),
}

impl MockResponse {
    pub fn report(report: Report) -> Self {
        MockResponse::Report(Box::new(report))
    }

    pub fn after(self, delay: Duration) -> Self {
        MockResponse::Delayed(delay, Box::new(self))
    }
}

/// A hand-rolled mock implementing [`AnalysisClient`] for tests.
///
/// Supports:
/// - A fixed response (used for every call), **or**
/// - A sequence of responses (one per call, repeating the last if exhausted).
/// - Optional per-call latency on top of any [`MockResponse::Delayed`].
/// - Call counting and the list of locators seen.
pub struct MockAnalysis {
    /// Pending responses, stored reversed so `pop()` yields the next one.
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    locators: Mutex<Vec<String>>,
}

impl MockAnalysis {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            call_count: AtomicUsize::new(0),
            locators: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        let fallback = responses[responses.len() - 1].clone();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            fallback,
            delay: None,
            call_count: AtomicUsize::new(0),
            locators: Mutex::new(Vec::new()),
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `analyze()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Locators passed to `analyze()`, in call order.
    pub fn locators(&self) -> Vec<String> {
        self.locators.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = self.responses.lock().unwrap();
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl AnalysisClient for MockAnalysis {
    fn analyze<'a>(
        &'a self,
        locator: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Report, AnalysisError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.locators.lock().unwrap().push(locator.to_string());
        let mut response = self.next_response();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            loop {
                match response {
                    MockResponse::Report(report) => return Ok(*report),
                    MockResponse::Error(e) => return Err(e),
                    MockResponse::Delayed(d, inner) => {
                        tokio::time::sleep(d).await;
                        response = *inner;
                    }
                }
            }
        })
    }
}
