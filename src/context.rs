// src/context.rs

use reqwest::header::HeaderMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Header (and log field) name carrying the request correlation id.
pub const CORRELATION_ID_HEADER: &str = "correlationid";

/// Request-scoped values threaded through every outbound call.
///
/// The correlation id tags every log line emitted on behalf of the request.
/// The optional deadline bounds the whole call, in addition to the per-request
/// timeout configured on the HTTP client.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    correlation_id: Option<String>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no correlation id and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context tagged with a freshly generated correlation id.
    pub fn generated() -> Self {
        Self::new().with_correlation_id(Uuid::new_v4().to_string())
    }

    /// Builds a context from inbound request headers, picking up the
    /// `correlationid` header when present and non-empty.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let correlation_id = headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self { correlation_id, deadline: None }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline to `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The correlation id, or an empty string when none was supplied.
    pub fn correlation_id(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or("")
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Runs `fut` to completion, or until the context deadline passes.
    ///
    /// Returns `None` if the deadline elapsed first.
    pub(crate) async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
            None => Some(fut.await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn reads_correlation_id_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, HeaderValue::from_static("req-42"));
        let ctx = RequestContext::from_headers(&headers);
        assert_eq!(ctx.correlation_id(), "req-42");
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn empty_header_means_no_correlation_id() {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_ID_HEADER, HeaderValue::from_static(""));
        assert_eq!(RequestContext::from_headers(&headers).correlation_id(), "");
        assert_eq!(RequestContext::from_headers(&HeaderMap::new()).correlation_id(), "");
    }

    #[test]
    fn generated_ids_are_uuids() {
        let ctx = RequestContext::generated();
        assert!(Uuid::parse_str(ctx.correlation_id()).is_ok());
        assert_ne!(ctx.correlation_id(), RequestContext::generated().correlation_id());
    }

    #[tokio::test]
    async fn run_gives_up_after_deadline() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(10));
        let outcome = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                1
            })
            .await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn run_without_deadline_completes() {
        assert_eq!(RequestContext::new().run(async { 7 }).await, Some(7));
    }
}
