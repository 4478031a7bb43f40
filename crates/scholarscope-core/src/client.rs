//! Outbound call to the analysis service.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::model::Report;

/// Default service endpoint (local FastAPI instance).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Crawling a large profile can take minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Why an analysis request failed. Clonable so the controller can keep the
/// last one around for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("analysis request timed out")]
    Timeout,
    #[error("could not reach analysis service: {0}")]
    Transport(String),
    #[error("analysis service returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("malformed report payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalysisError::Timeout
        } else if e.is_decode() {
            AnalysisError::Decode(e.to_string())
        } else {
            AnalysisError::Transport(e.to_string())
        }
    }
}

/// Something that turns a profile locator into a [`Report`].
pub trait AnalysisClient: Send + Sync {
    fn analyze<'a>(
        &'a self,
        locator: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Report, AnalysisError>> + Send + 'a>>;
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
    is_cs_ai: bool,
}

/// `POST {base_url}/analyze` over reqwest.
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
    is_cs_ai: bool,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            is_cs_ai: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the service should rank venues against the CS/AI venue lists.
    pub fn with_cs_ai(mut self, is_cs_ai: bool) -> Self {
        self.is_cs_ai = is_cs_ai;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/analyze", self.base_url)
    }
}

impl Default for HttpAnalysisClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl AnalysisClient for HttpAnalysisClient {
    fn analyze<'a>(
        &'a self,
        locator: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Report, AnalysisError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.endpoint();
            tracing::debug!(%url, locator, "requesting analysis");

            let resp = self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(&AnalyzeRequest {
                    url: locator,
                    is_cs_ai: self.is_cs_ai,
                })
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(AnalysisError::Status {
                    status: status.as_u16(),
                    detail: error_detail(&body),
                });
            }

            let bytes = resp.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|e| AnalysisError::Decode(e.to_string()))
        })
    }
}

/// Pull a readable message out of an error body. FastAPI errors look like
/// `{"detail": "..."}`; anything else is passed through, shortened.
fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(detail) = value.get("detail").and_then(|d| d.as_str())
    {
        return detail.to_string();
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        let mut short: String = trimmed.chars().take(199).collect();
        short.push('\u{2026}');
        short
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = HttpAnalysisClient::new("http://localhost:8000/");
        assert_eq!(client.endpoint(), "http://localhost:8000/analyze");
    }

    #[test]
    fn request_body_carries_locator_and_flag() {
        let body = serde_json::to_value(AnalyzeRequest {
            url: "scholar.google.com/citations?user=ABC",
            is_cs_ai: true,
        })
        .unwrap();
        assert_eq!(body["url"], "scholar.google.com/citations?user=ABC");
        assert_eq!(body["is_cs_ai"], true);
    }

    #[test]
    fn error_detail_prefers_fastapi_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "Invalid Google Scholar URL"}"#),
            "Invalid Google Scholar URL"
        );
        assert_eq!(error_detail("  Internal Server Error \n"), "Internal Server Error");
    }

    #[test]
    fn error_detail_shortens_long_bodies() {
        let long = "x".repeat(500);
        let detail = error_detail(&long);
        assert_eq!(detail.chars().count(), 200);
        assert!(detail.ends_with('\u{2026}'));
    }

    #[test]
    fn status_error_message_is_readable() {
        let err = AnalysisError::Status {
            status: 404,
            detail: "Profile not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "analysis service returned HTTP 404: Profile not found"
        );
    }
}
