//! Prelude module for convenient imports.
//!
//! Re-exports the types most programs against the try-on API need.
//!
//! # Usage
//!
//! ```rust
//! use trailroom_sdk::prelude::*;
//!
//! let quote = PricingQuote::for_credits(2_100u32);
//! assert!(quote.has_discount());
//! ```

// Core types
pub use crate::Error;
pub use crate::Result;

// Client
pub use crate::Client;
pub use crate::ClientBuilder;
pub use crate::client::RetryConfig;

// Authentication
pub use crate::auth::{AuthTokens, FileTokenStore, MemoryTokenStore, TokenStore};

// Jobs
pub use crate::jobs::{JobPoller, PollConfig};
pub use crate::types::{
    BatchItem, ImageInput, JobStatus, TryOnJob, TryOnMode, TryOnRequest,
};

// Pricing
pub use crate::pricing::{PricingQuote, QuoteDisplay};

// Webhooks
pub use crate::webhooks::WebhookEvent;

pub use tokio_util::sync::CancellationToken;
