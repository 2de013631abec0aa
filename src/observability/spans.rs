//! Structured span for outbound API calls.

use std::time::{Duration, Instant};
use tracing::{Level, Span, field, span};

/// One API call: method and path up front; status, attempt count and latency
/// recorded as they become known.
pub struct RequestSpan {
    span: Span,
    start: Instant,
}

impl RequestSpan {
    pub fn new(method: &str, path: &str) -> Self {
        let span = span!(
            Level::DEBUG,
            "api.request",
            method = method,
            path = path,
            status = field::Empty,
            attempts = field::Empty,
            latency_ms = field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn record_status(&self, status: u16) {
        self.span.record("status", status);
    }

    pub fn record_attempts(&self, attempts: u32) {
        self.span.record("attempts", attempts);
    }

    /// Records latency and closes the span.
    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        self.span.record("latency_ms", elapsed.as_millis() as u64);
        elapsed
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}
