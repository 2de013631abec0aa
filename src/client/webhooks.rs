//! `/webhooks` endpoints.

use url::Url;

use super::{ApiRequest, Client, require_id};
use crate::types::{
    CreateWebhookRequest, MessageResponse, SupportedEvents, UpdateWebhookRequest, Webhook,
    WebhookDelivery,
};
use crate::{Error, Result};

pub struct WebhooksClient<'a> {
    client: &'a Client,
}

impl<'a> WebhooksClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Webhook>> {
        self.client.execute(ApiRequest::get(["webhooks"])).await
    }

    pub async fn get(&self, webhook_id: &str) -> Result<Webhook> {
        let webhook_id = require_id("webhook", webhook_id)?;
        self.client
            .execute(ApiRequest::get(["webhooks", webhook_id]))
            .await
    }

    /// Registers an endpoint. The returned [`Webhook::secret`] signs every
    /// delivery; see [`crate::webhooks::verify`].
    pub async fn create(&self, request: &CreateWebhookRequest) -> Result<Webhook> {
        validate_url(&request.url)?;
        if request.name.trim().is_empty() {
            return Err(Error::invalid_request("webhook name is required"));
        }
        if request.events.is_empty() {
            return Err(Error::invalid_request("subscribe to at least one event"));
        }
        self.client
            .execute(ApiRequest::post(["webhooks"]).json(request)?)
            .await
    }

    pub async fn update(&self, webhook_id: &str, request: &UpdateWebhookRequest) -> Result<Webhook> {
        let webhook_id = require_id("webhook", webhook_id)?;
        if let Some(url) = &request.url {
            validate_url(url)?;
        }
        if request.events.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::invalid_request("subscribe to at least one event"));
        }
        self.client
            .execute(ApiRequest::put(["webhooks", webhook_id]).json(request)?)
            .await
    }

    pub async fn delete(&self, webhook_id: &str) -> Result<MessageResponse> {
        let webhook_id = require_id("webhook", webhook_id)?;
        self.client
            .execute(ApiRequest::delete(["webhooks", webhook_id]))
            .await
    }

    pub async fn deliveries(&self, webhook_id: &str, limit: u32) -> Result<Vec<WebhookDelivery>> {
        let webhook_id = require_id("webhook", webhook_id)?;
        let request = ApiRequest::get(["webhooks", webhook_id, "deliveries"]).query("limit", limit);
        self.client.execute(request).await
    }

    pub async fn supported_events(&self) -> Result<SupportedEvents> {
        self.client
            .execute(ApiRequest::get(["webhooks", "events", "supported"]))
            .await
    }

    /// Sends a `test` event and returns the resulting delivery record.
    pub async fn test(&self, webhook_id: &str) -> Result<WebhookDelivery> {
        let webhook_id = require_id("webhook", webhook_id)?;
        self.client
            .execute(ApiRequest::post(["webhooks", webhook_id, "test"]))
            .await
    }
}

fn validate_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::invalid_request(format!("invalid webhook URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::invalid_request(format!(
            "webhook URL must be http(s): {raw}"
        )));
    }
    Ok(())
}
