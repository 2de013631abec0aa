//! # trailroom-sdk
//!
//! Rust SDK for the TrailRoom virtual try-on API.
//!
//! The crate bundles the pieces a client needs around the REST API: a tiered
//! credit pricing engine, an exponential-backoff retrier for outbound calls,
//! typed endpoint bindings, a job poller with cancellation, and pluggable
//! token storage.
//!
//! ## Pricing Preview
//!
//! ```rust
//! use rust_decimal_macros::dec;
//!
//! let quote = trailroom_sdk::quote(10_000u32);
//! assert_eq!(quote.discount_percent, dec!(12.4));
//! assert_eq!(quote.final_price, dec!(8760));
//! assert_eq!(quote.display().final_price, "₹8,760");
//! ```
//!
//! ## Try-On Job
//!
//! ```rust,no_run
//! use trailroom_sdk::{Client, ImageInput, TryOnRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), trailroom_sdk::Error> {
//!     let client = Client::builder().from_env().build()?;
//!     client.auth().login("me@example.com", "secret").await?;
//!
//!     let person = ImageInput::from_path("person.jpg").await?;
//!     let shirt = ImageInput::from_path("shirt.png").await?;
//!     let job = client.tryon().create(TryOnRequest::top(&person, &shirt)).await?;
//!
//!     let done = client
//!         .tryon()
//!         .wait_for_completion(&job.id, &CancellationToken::new())
//!         .await?;
//!     println!("{:?}", done.status);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod client;
pub mod config;
pub mod jobs;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod types;
pub mod webhooks;

pub use auth::{AuthTokens, FileTokenStore, MemoryTokenStore, TokenStore};
pub use client::{
    AnalyticsClient, AuthClient, Client, ClientBuilder, CreditsClient, ExponentialBackoff,
    InvoicesClient, PaymentsClient, PricingClient, Retrier, RetryConfig, Retryable, TryOnClient,
    WebhooksClient, retry_with_backoff,
};
pub use config::{ClientSettings, ConfigBuilder, ConfigError, ConfigProvider, ConfigResult};
pub use jobs::{BatchSource, JobPoller, JobSource, PollConfig};
pub use pricing::{
    CurrencyFormat, DiscountSchedule, MAX_CREDITS, MIN_CREDITS, Plan, PricingQuote, QuoteDisplay,
    STANDARD_SCHEDULE,
};
pub use types::{
    BatchItem, BatchJob, BatchJobStatus, CreditBalance, CreditTransaction, CreditUsage,
    EndpointStats, ImageInput, Invoice, JobStatus, Payment, PaymentOrder, PaymentStatus, Period,
    TransactionType, TryOnJob, TryOnMode, TryOnRequest, UsageStats, User, Webhook,
    WebhookDelivery,
};
pub use webhooks::WebhookEvent;

use std::time::Duration;

/// Error type for trailroom-sdk operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// API returned a non-success response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Network connectivity or request failed.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// No usable credentials, or the session could not be refreshed.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request rejected locally before any I/O.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Webhook signature did not match the payload.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Operation exceeded timeout.
    #[error("Operation timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Job stayed non-terminal for the whole poll budget.
    #[error("Job {job_id} still running after {polls} polls")]
    PollLimitExceeded { job_id: String, polls: u32 },

    /// Job reached the failed state.
    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Authentication or authorization failures (401, 403)
    Authorization,
    /// Configuration or local validation errors
    Configuration,
    /// Requests the server rejected as malformed or not found (4xx)
    Client,
    /// Network or server errors that may succeed on retry
    Transient,
    /// Internal errors (IO, JSON, signatures, failed jobs)
    Internal,
    /// Time or poll budgets exhausted, or cancelled
    ResourceLimit,
}

impl Error {
    pub fn auth(message: impl Into<String>) -> Self {
        Error::Auth {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Auth { .. }
            | Error::Api {
                status: 401 | 403, ..
            } => ErrorCategory::Authorization,

            Error::Config(_) | Error::InvalidRequest(_) => ErrorCategory::Configuration,

            Error::Api {
                status: 400..=499, ..
            } => ErrorCategory::Client,

            Error::Network(_) | Error::Api { .. } => ErrorCategory::Transient,

            Error::Timeout(_) | Error::Cancelled | Error::PollLimitExceeded { .. } => {
                ErrorCategory::ResourceLimit
            }

            Error::Io(_) | Error::Json(_) | Error::InvalidSignature | Error::JobFailed { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn is_authorization_error(&self) -> bool {
        self.category() == ErrorCategory::Authorization
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_resource_limit(&self) -> bool {
        self.category() == ErrorCategory::ResourceLimit
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(400..=499))
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. } | Error::Auth { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound { key } => {
                Error::Config(format!("Key not found: {}", key))
            }
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Env(e) => Error::Config(e.to_string()),
            config::ConfigError::Provider { message } => Error::Config(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Price preview for `credits` under the standard discount schedule.
pub fn quote(credits: impl Into<rust_decimal::Decimal>) -> PricingQuote {
    PricingQuote::for_credits(credits)
}
