//! Layered client configuration.
//!
//! ```rust,no_run
//! use trailroom_sdk::config::{ClientSettings, ConfigBuilder, MemoryConfigProvider};
//!
//! # async fn example() -> Result<(), trailroom_sdk::ConfigError> {
//! let overrides = MemoryConfigProvider::new().value("retry.max", "5");
//! let config = ConfigBuilder::new().memory(overrides).env().build();
//! let settings = ClientSettings::load(&config).await?;
//! assert_eq!(settings.retry.max_retries, 5);
//! # Ok(())
//! # }
//! ```

mod composite;
mod env;
mod memory;
mod provider;
mod settings;

pub use composite::CompositeConfigProvider;
pub use env::{ENV_PREFIX, EnvConfigProvider};
pub use memory::MemoryConfigProvider;
pub use provider::{ConfigProvider, ConfigProviderExt};
pub use settings::{ClientSettings, keys};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Key not found: {key}")]
    NotFound { key: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    /// Provider refused the operation (e.g. writes to the environment).
    #[error("Provider error: {message}")]
    Provider { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Stacks providers; the first one added has the highest priority.
#[derive(Default)]
pub struct ConfigBuilder {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `TRAILROOM_`-prefixed environment variables.
    pub fn env(self) -> Self {
        self.provider(Box::new(EnvConfigProvider::new()))
    }

    pub fn env_with_prefix(self, prefix: &str) -> Self {
        self.provider(Box::new(EnvConfigProvider::prefixed(prefix)))
    }

    pub fn memory(self, provider: MemoryConfigProvider) -> Self {
        self.provider(Box::new(provider))
    }

    pub fn provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> CompositeConfigProvider {
        self.providers
            .into_iter()
            .fold(CompositeConfigProvider::new(), |composite, provider| {
                composite.provider(provider)
            })
    }
}
