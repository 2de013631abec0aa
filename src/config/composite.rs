//! Chains providers in priority order; the first hit wins.

use std::collections::BTreeSet;

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

#[derive(Default)]
pub struct CompositeConfigProvider {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

#[async_trait::async_trait]
impl ConfigProvider for CompositeConfigProvider {
    fn name(&self) -> &str {
        "composite"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        for provider in &self.providers {
            if let Some(value) = provider.get_raw(key).await? {
                tracing::trace!(key, provider = provider.name(), "config value resolved");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Writes to the first provider that accepts writes.
    async fn set_raw(&self, key: &str, value: &str) -> ConfigResult<()> {
        for provider in &self.providers {
            match provider.set_raw(key, value).await {
                Err(ConfigError::Provider { .. }) => continue,
                other => return other,
            }
        }
        Err(ConfigError::Provider {
            message: format!("no writable provider for {key}"),
        })
    }

    /// Deletes from every writable provider; read-only ones are skipped.
    async fn delete(&self, key: &str) -> ConfigResult<bool> {
        let mut deleted = false;
        for provider in &self.providers {
            match provider.delete(key).await {
                Ok(removed) => deleted |= removed,
                Err(ConfigError::Provider { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(deleted)
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let mut keys = BTreeSet::new();
        for provider in &self.providers {
            keys.extend(provider.list_keys(prefix).await?);
        }
        Ok(keys.into_iter().collect())
    }
}

impl std::fmt::Debug for CompositeConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeConfigProvider")
            .field("providers", &self.provider_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvConfigProvider, MemoryConfigProvider};

    #[tokio::test]
    async fn test_first_provider_wins() {
        let composite = CompositeConfigProvider::new()
            .provider(Box::new(
                MemoryConfigProvider::named("overrides").value("retry.max", "5"),
            ))
            .provider(Box::new(
                MemoryConfigProvider::named("defaults")
                    .value("retry.max", "3")
                    .value("poll.max", "150"),
            ));

        assert_eq!(
            composite.get_raw("retry.max").await.unwrap().as_deref(),
            Some("5")
        );
        assert_eq!(
            composite.get_raw("poll.max").await.unwrap().as_deref(),
            Some("150")
        );
        assert_eq!(composite.get_raw("base.url").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_writes_skip_read_only_providers() {
        let composite = CompositeConfigProvider::new()
            .provider(Box::new(EnvConfigProvider::prefixed("TRAILROOM_TEST_COMPOSITE_")))
            .provider(Box::new(MemoryConfigProvider::new()));

        composite.set_raw("timeout.ms", "5000").await.unwrap();
        assert_eq!(
            composite.get_raw("timeout.ms").await.unwrap().as_deref(),
            Some("5000")
        );
        assert!(composite.delete("timeout.ms").await.unwrap());
        assert_eq!(composite.get_raw("timeout.ms").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_no_writable_provider() {
        let composite = CompositeConfigProvider::new()
            .provider(Box::new(EnvConfigProvider::new()));
        assert!(composite.set_raw("retry.max", "1").await.is_err());
    }

    #[tokio::test]
    async fn test_list_keys_deduplicated() {
        let composite = CompositeConfigProvider::new()
            .provider(Box::new(
                MemoryConfigProvider::new()
                    .value("poll.max", "1")
                    .value("poll.interval.ms", "10"),
            ))
            .provider(Box::new(MemoryConfigProvider::new().value("poll.max", "2")));

        assert_eq!(
            composite.list_keys("poll.").await.unwrap(),
            vec!["poll.interval.ms", "poll.max"]
        );
    }
}
