//! Token persistence backends.

mod file;
mod memory;

use async_trait::async_trait;

use super::AuthTokens;
use crate::Result;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// Where the client keeps the current session.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<AuthTokens>>;

    async fn set(&self, tokens: AuthTokens) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
