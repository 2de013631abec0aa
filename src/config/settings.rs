//! Client settings resolved from a [`ConfigProvider`].

use std::time::Duration;

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult, EnvConfigProvider};
use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ExponentialBackoff, RetryConfig};
use crate::jobs::PollConfig;

/// Recognised configuration keys.
pub mod keys {
    pub const BASE_URL: &str = "base.url";
    pub const TIMEOUT_MS: &str = "timeout.ms";
    pub const RETRY_MAX: &str = "retry.max";
    pub const RETRY_INITIAL_MS: &str = "retry.initial.ms";
    pub const RETRY_MAX_MS: &str = "retry.max.ms";
    pub const POLL_INTERVAL_MS: &str = "poll.interval.ms";
    pub const POLL_MAX: &str = "poll.max";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub poll: PollConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl ClientSettings {
    /// Defaults overlaid with whatever `provider` defines, then validated.
    pub async fn load<P: ConfigProvider + ?Sized>(provider: &P) -> ConfigResult<Self> {
        let mut settings = Self::default();

        if let Some(url) = provider.get_raw(keys::BASE_URL).await? {
            settings.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = read_u64(provider, keys::TIMEOUT_MS).await? {
            settings.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = read_u64(provider, keys::RETRY_MAX).await? {
            settings.retry.max_retries = narrow(keys::RETRY_MAX, n)?;
        }

        let initial = read_u64(provider, keys::RETRY_INITIAL_MS)
            .await?
            .map(Duration::from_millis)
            .unwrap_or(settings.retry.backoff.initial());
        let max = read_u64(provider, keys::RETRY_MAX_MS)
            .await?
            .map(Duration::from_millis)
            .unwrap_or(settings.retry.backoff.max());
        settings.retry.backoff = ExponentialBackoff::new(initial, max);

        if let Some(ms) = read_u64(provider, keys::POLL_INTERVAL_MS).await? {
            settings.poll.interval = Duration::from_millis(ms);
        }
        if let Some(n) = read_u64(provider, keys::POLL_MAX).await? {
            settings.poll.max_polls = narrow(keys::POLL_MAX, n)?;
        }

        settings.validate()?;
        tracing::debug!(
            base_url = %settings.base_url,
            source = provider.name(),
            "client settings loaded"
        );
        Ok(settings)
    }

    /// Settings from `TRAILROOM_*` environment variables.
    pub async fn from_env() -> ConfigResult<Self> {
        Self::load(&EnvConfigProvider::new()).await
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| invalid(keys::BASE_URL, format!("{e}: {}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                keys::BASE_URL,
                format!("unsupported scheme {}", url.scheme()),
            ));
        }
        if self.timeout.is_zero() {
            return Err(invalid(keys::TIMEOUT_MS, "must be positive".into()));
        }
        if self.retry.backoff.initial() > self.retry.backoff.max() {
            return Err(invalid(
                keys::RETRY_INITIAL_MS,
                format!(
                    "{}ms exceeds {} of {}ms",
                    self.retry.backoff.initial().as_millis(),
                    keys::RETRY_MAX_MS,
                    self.retry.backoff.max().as_millis()
                ),
            ));
        }
        if self.poll.interval.is_zero() {
            return Err(invalid(keys::POLL_INTERVAL_MS, "must be positive".into()));
        }
        if self.poll.max_polls == 0 {
            return Err(invalid(keys::POLL_MAX, "must be at least 1".into()));
        }
        Ok(())
    }
}

async fn read_u64<P: ConfigProvider + ?Sized>(provider: &P, key: &str) -> ConfigResult<Option<u64>> {
    provider
        .get_raw(key)
        .await?
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid(key, format!("{e}: {raw:?}")))
        })
        .transpose()
}

fn narrow(key: &str, value: u64) -> ConfigResult<u32> {
    u32::try_from(value).map_err(|_| invalid(key, format!("{value} is out of range")))
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}
