//! Retry with exponential backoff for outbound API calls.
//!
//! Client errors (HTTP 4xx) are returned after the first attempt; every other
//! failure is retried up to `max_retries` times with a doubling, capped delay.

mod backoff;

pub use backoff::ExponentialBackoff;

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Classification hook for the retrier.
pub trait Retryable {
    /// HTTP status carried by the failure, if any.
    fn status_code(&self) -> Option<u16>;

    fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(400..=499))
    }

    /// Whether another attempt may succeed. Defaults to anything but a 4xx.
    fn is_transient(&self) -> bool {
        !self.is_client_error()
    }
}

impl Retryable for crate::Error {
    fn status_code(&self) -> Option<u16> {
        crate::Error::status_code(self)
    }

    fn is_transient(&self) -> bool {
        self.is_retryable()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff: ExponentialBackoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: ExponentialBackoff::default(),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            backoff: ExponentialBackoff::new(initial_delay, max_delay),
        }
    }

    /// Single attempt, no waits.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Runs an operation under a [`RetryConfig`].
///
/// Each call owns its attempt counter, so one `Retrier` can serve any number
/// of concurrent operations.
#[derive(Debug, Clone, Default)]
pub struct Retrier {
    config: RetryConfig,
}

impl Retrier {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Returns the first success, or the error from the last attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let mut retries = 0;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_transient() {
                tracing::debug!(
                    status = ?error.status_code(),
                    "permanent error, not retrying: {}",
                    error
                );
                return Err(error);
            }

            if retries >= self.config.max_retries {
                tracing::warn!(
                    attempts = retries + 1,
                    "giving up after {} attempts: {}",
                    retries + 1,
                    error
                );
                return Err(error);
            }

            let delay = self.config.backoff.delay_for(retries);
            retries += 1;
            tracing::warn!(
                attempt = retries,
                max_retries = self.config.max_retries,
                delay_ms = delay.as_millis() as u64,
                "request failed, retrying: {}",
                error
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// One-shot form of [`Retrier::execute`].
pub async fn retry_with_backoff<F, Fut, T, E>(config: RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    Retrier::new(config).execute(operation).await
}
