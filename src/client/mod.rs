//! HTTP client for the TrailRoom REST API.
//!
//! [`Client`] owns the connection pool, the token store and the retry policy.
//! Per-resource sub-clients borrow it:
//!
//! ```rust,no_run
//! # async fn run() -> trailroom_sdk::Result<()> {
//! let client = trailroom_sdk::Client::builder()
//!     .base_url("http://localhost:8001")
//!     .build()?;
//!
//! client.auth().login("me@example.com", "secret").await?;
//! let balance = client.credits().balance().await?;
//! println!("{} credits", balance.total());
//! # Ok(())
//! # }
//! ```

mod analytics;
mod auth;
mod credits;
mod error;
mod invoices;
mod payments;
mod pricing;
pub mod resilience;
mod tryon;
mod webhooks;

pub use analytics::AnalyticsClient;
pub use auth::AuthClient;
pub use credits::CreditsClient;
pub use error::ErrorResponse;
pub use invoices::InvoicesClient;
pub use payments::PaymentsClient;
pub use pricing::PricingClient;
pub use resilience::{ExponentialBackoff, Retrier, RetryConfig, Retryable, retry_with_backoff};
pub use tryon::TryOnClient;
pub use webhooks::WebhooksClient;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;
use url::Url;

use crate::auth::{AuthTokens, MemoryTokenStore, TokenStore};
use crate::config::ClientSettings;
use crate::jobs::{BatchSource, JobSource, PollConfig};
use crate::observability::RequestSpan;
use crate::types::{BatchJobStatus, TryOnJob};
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.trailroom.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const API_PREFIX: &str = "/api/v1";
pub const BASE_URL_ENV: &str = "TRAILROOM_BASE_URL";

/// Handle to the API. Cheap to clone; clones share the connection pool and
/// token store.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    retrier: Retrier,
    poll: PollConfig,
}

impl Client {
    /// Client against the default base URL with in-memory tokens.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    pub fn tryon(&self) -> TryOnClient<'_> {
        TryOnClient::new(self)
    }

    pub fn credits(&self) -> CreditsClient<'_> {
        CreditsClient::new(self)
    }

    pub fn pricing(&self) -> PricingClient<'_> {
        PricingClient::new(self)
    }

    pub fn payments(&self) -> PaymentsClient<'_> {
        PaymentsClient::new(self)
    }

    pub fn webhooks(&self) -> WebhooksClient<'_> {
        WebhooksClient::new(self)
    }

    pub fn invoices(&self) -> InvoicesClient<'_> {
        InvoicesClient::new(self)
    }

    pub fn analytics(&self) -> AnalyticsClient<'_> {
        AnalyticsClient::new(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn retry_config(&self) -> &RetryConfig {
        self.retrier.config()
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Authenticated call. A 401 triggers one session refresh and one replay.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        match self.dispatch(&request, true).await {
            Err(e) if e.status_code() == Some(401) => {
                let Some(tokens) = self.tokens.get().await? else {
                    return Err(e);
                };
                if !tokens.can_refresh() {
                    return Err(e);
                }
                tracing::warn!(path = %request.path(), "access token rejected, refreshing session");
                self.refresh_tokens(&tokens).await?;
                self.dispatch(&request, true).await
            }
            other => other,
        }
    }

    /// Call without credentials (login, register, OAuth, refresh).
    pub(crate) async fn execute_public<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T> {
        self.dispatch(&request, false).await
    }

    /// Exchanges the refresh token for a new access token and stores it.
    /// Any failure clears the store.
    pub(crate) async fn refresh_tokens(&self, tokens: &AuthTokens) -> Result<AuthTokens> {
        let refresh_token = tokens
            .refresh_token()
            .ok_or_else(|| Error::auth("no refresh token stored"))?;

        let request = ApiRequest::post(["auth", "refresh"]).json(&auth::RefreshRequest {
            refresh_token,
        })?;

        match self.dispatch::<auth::RefreshResponse>(&request, false).await {
            Ok(response) => {
                let rotated = tokens.rotated(response.access_token);
                self.tokens.set(rotated.clone()).await?;
                tracing::debug!("session refreshed");
                Ok(rotated)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed, clearing stored tokens");
                self.tokens.clear().await?;
                Err(e)
            }
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        authenticated: bool,
    ) -> Result<T> {
        let url = self.url_for(request)?;
        let span = RequestSpan::new(request.method.as_str(), &request.path());
        let attempts = AtomicU32::new(0);

        let result = self
            .retrier
            .execute(|| {
                attempts.fetch_add(1, Ordering::Relaxed);
                self.send_once(request, &url, authenticated, &span)
            })
            .instrument(span.span().clone())
            .await;

        span.record_attempts(attempts.load(Ordering::Relaxed));
        span.finish();

        // Decoded once: a 2xx the server accepted is never re-sent.
        let body = result?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(
                method = %request.method,
                path = %request.path(),
                error = %e,
                "undecodable success response"
            );
            Error::Json(e)
        })
    }

    /// One attempt: sends the request and returns the body of a 2xx response.
    async fn send_once(
        &self,
        request: &ApiRequest,
        url: &Url,
        authenticated: bool,
        span: &RequestSpan,
    ) -> Result<Vec<u8>> {
        let mut builder = self.http.request(request.method.clone(), url.clone());

        if authenticated && let Some(tokens) = self.tokens.get().await? {
            builder = builder.header(AUTHORIZATION, tokens.bearer());
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        tracing::debug!(method = %request.method, path = %request.path(), "sending request");
        let response = builder.send().await?;
        let status = response.status();
        span.record_status(status.as_u16());

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(error::api_error(status, &body));
        }
        Ok(body.to_vec())
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("unusable base URL: {}", self.base_url)))?;
            segments
                .pop_if_empty()
                .extend(API_PREFIX.split('/').filter(|s| !s.is_empty()))
                .extend(&request.segments);
        }
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("retry", self.retrier.config())
            .field("poll", &self.poll)
            .finish()
    }
}

#[async_trait]
impl JobSource for Client {
    async fn fetch_job(&self, job_id: &str) -> Result<TryOnJob> {
        self.tryon().get(job_id).await
    }
}

#[async_trait]
impl BatchSource for Client {
    async fn fetch_batch(&self, job_ids: &[String]) -> Result<Vec<BatchJobStatus>> {
        self.tryon().batch_status(job_ids).await
    }
}

/// One REST call: method, path under [`API_PREFIX`], query and JSON body.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub(crate) fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub(crate) fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    pub(crate) fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PUT, segments)
    }

    pub(crate) fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    pub(crate) fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// Rejects empty or separator-bearing ids before they reach a URL.
pub(crate) fn require_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(Error::invalid_request(format!("invalid {kind} id: {id:?}")));
    }
    Ok(id)
}

#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    tokens: Option<Arc<dyn TokenStore>>,
    retry: Option<RetryConfig>,
    poll: Option<PollConfig>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Picks up `TRAILROOM_BASE_URL` when set. Use
    /// [`ClientSettings::from_env`] for the full set of variables.
    pub fn from_env(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            self.base_url = Some(url);
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn token_store(mut self, store: impl TokenStore + 'static) -> Self {
        self.tokens = Some(Arc::new(store));
        self
    }

    pub fn shared_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(store);
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = Some(config);
        self
    }

    pub fn no_retry(mut self) -> Self {
        self.retry = Some(RetryConfig::no_retry());
        self
    }

    pub fn poll(mut self, config: PollConfig) -> Self {
        self.poll = Some(config);
        self
    }

    /// Applies resolved settings; later builder calls still override them.
    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.base_url = Some(settings.base_url);
        self.timeout = Some(settings.timeout);
        self.retry = Some(settings.retry);
        self.poll = Some(settings.poll);
        self
    }

    /// Bring your own `reqwest::Client`; `timeout` is then ignored.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<Client> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let base_url = Url::parse(raw)
            .map_err(|e| Error::Config(format!("invalid base URL {raw}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("unsupported base URL: {raw}")));
        }

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()
                .map_err(Error::Network)?,
        };

        Ok(Client {
            http,
            base_url,
            tokens: self
                .tokens
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
            retrier: Retrier::new(self.retry.unwrap_or_default()),
            poll: self.poll.unwrap_or_default(),
        })
    }
}
