//! Environment variable provider.
//!
//! Read-only: `retry.max` is looked up as `TRAILROOM_RETRY_MAX`.

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

pub const ENV_PREFIX: &str = "TRAILROOM_";

#[derive(Debug, Clone)]
pub struct EnvConfigProvider {
    prefix: String,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::prefixed(ENV_PREFIX)
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn env_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_uppercase().replace('.', "_"))
    }

    fn key_from_env(&self, env_name: &str) -> Option<String> {
        env_name
            .strip_prefix(&self.prefix)
            .map(|rest| rest.to_lowercase().replace('_', "."))
    }

    fn read_only() -> ConfigError {
        ConfigError::Provider {
            message: "environment variables are read-only".into(),
        }
    }
}

impl Default for EnvConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ConfigProvider for EnvConfigProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        match std::env::var(self.env_key(key)) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::Env(e)),
        }
    }

    async fn set_raw(&self, _key: &str, _value: &str) -> ConfigResult<()> {
        Err(Self::read_only())
    }

    async fn delete(&self, _key: &str) -> ConfigResult<bool> {
        Err(Self::read_only())
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let env_prefix = self.env_key(prefix);
        Ok(std::env::vars()
            .filter(|(name, _)| name.starts_with(&env_prefix))
            .filter_map(|(name, _)| self.key_from_env(&name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_conversion() {
        let provider = EnvConfigProvider::new();
        assert_eq!(provider.env_key("base.url"), "TRAILROOM_BASE_URL");
        assert_eq!(provider.env_key("retry.initial.ms"), "TRAILROOM_RETRY_INITIAL_MS");
        assert_eq!(
            provider.key_from_env("TRAILROOM_POLL_INTERVAL_MS"),
            Some("poll.interval.ms".to_string())
        );
        assert_eq!(provider.key_from_env("HOME"), None);
    }

    #[tokio::test]
    async fn test_env_provider_get() {
        let provider = EnvConfigProvider::prefixed("TRAILROOM_TEST_ENV_");

        // SAFETY: test-only, unique variable name
        unsafe { std::env::set_var("TRAILROOM_TEST_ENV_RETRY_MAX", "7") };
        assert_eq!(
            provider.get_raw("retry.max").await.unwrap(),
            Some("7".to_string())
        );
        assert_eq!(provider.list_keys("retry").await.unwrap(), vec!["retry.max"]);
        unsafe { std::env::remove_var("TRAILROOM_TEST_ENV_RETRY_MAX") };

        assert_eq!(provider.get_raw("retry.max").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_value_is_unset() {
        let provider = EnvConfigProvider::prefixed("TRAILROOM_TEST_BLANK_");

        // SAFETY: test-only, unique variable name
        unsafe { std::env::set_var("TRAILROOM_TEST_BLANK_BASE_URL", "  ") };
        assert_eq!(provider.get_raw("base.url").await.unwrap(), None);
        unsafe { std::env::remove_var("TRAILROOM_TEST_BLANK_BASE_URL") };
    }

    #[tokio::test]
    async fn test_env_provider_read_only() {
        let provider = EnvConfigProvider::new();
        assert!(matches!(
            provider.set_raw("base.url", "http://x").await,
            Err(ConfigError::Provider { .. })
        ));
        assert!(provider.delete("base.url").await.is_err());
    }
}
