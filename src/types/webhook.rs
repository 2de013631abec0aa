//! Webhook subscriptions and delivery log.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::webhooks::WebhookEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub user_id: String,
    pub url: String,
    pub name: String,
    pub events: Vec<WebhookEvent>,
    /// Shared secret for verifying `X-Webhook-Signature`.
    pub secret: String,
    pub is_active: bool,
    #[serde(with = "crate::types::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::types::timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl Webhook {
    pub fn listens_to(&self, event: WebhookEvent) -> bool {
        self.is_active && self.events.contains(&event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWebhookRequest {
    pub url: String,
    pub name: String,
    pub events: Vec<WebhookEvent>,
}

impl CreateWebhookRequest {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            events: Vec::new(),
        }
    }

    pub fn event(mut self, event: WebhookEvent) -> Self {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
        self
    }
}

/// Partial update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateWebhookRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<WebhookEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateWebhookRequest {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn events(mut self, events: impl IntoIterator<Item = WebhookEvent>) -> Self {
        self.events = Some(events.into_iter().collect());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookDelivery {
    pub id: String,
    pub webhook_id: String,
    /// Usually a [`WebhookEvent`] name; `test` for test deliveries.
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub response_code: Option<u16>,
    #[serde(default)]
    pub response_body: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub attempts: u32,
    pub max_attempts: u32,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub next_retry_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::types::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::types::timestamp::option")]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl WebhookDelivery {
    pub fn event(&self) -> Option<WebhookEvent> {
        self.event_type.parse().ok()
    }

    pub fn will_retry(&self) -> bool {
        self.status == DeliveryStatus::Pending && self.attempts < self.max_attempts
    }
}

/// Body of `/webhooks/events/supported`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupportedEvents {
    pub events: Vec<String>,
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
}
