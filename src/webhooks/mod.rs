//! Webhook event catalogue and signature verification.
//!
//! Deliveries are `POST`ed with the JSON payload as the body, the event name
//! in [`EVENT_TYPE_HEADER`] and a hex HMAC-SHA256 of the body, keyed with the
//! webhook's secret, in [`SIGNATURE_HEADER`].

mod signature;

pub use signature::{EVENT_TYPE_HEADER, SIGNATURE_HEADER, sign, verify, verify_request};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "tryon.completed")]
    TryonCompleted,
    #[serde(rename = "tryon.failed")]
    TryonFailed,
    #[serde(rename = "credits.low")]
    CreditsLow,
    #[serde(rename = "payment.completed")]
    PaymentCompleted,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 4] = [
        WebhookEvent::TryonCompleted,
        WebhookEvent::TryonFailed,
        WebhookEvent::CreditsLow,
        WebhookEvent::PaymentCompleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEvent::TryonCompleted => "tryon.completed",
            WebhookEvent::TryonFailed => "tryon.failed",
            WebhookEvent::CreditsLow => "credits.low",
            WebhookEvent::PaymentCompleted => "payment.completed",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WebhookEvent::TryonCompleted => "Triggered when a try-on job completes successfully",
            WebhookEvent::TryonFailed => "Triggered when a try-on job fails",
            WebhookEvent::CreditsLow => "Triggered when user credits fall below threshold",
            WebhookEvent::PaymentCompleted => "Triggered when a payment is successfully processed",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebhookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_request(format!(
                    "unsupported webhook event {s:?}, expected one of: {}",
                    WebhookEvent::ALL.map(WebhookEvent::as_str).join(", ")
                ))
            })
    }
}
