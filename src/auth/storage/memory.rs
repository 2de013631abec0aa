//! Process-local token store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TokenStore;
use crate::Result;
use crate::auth::AuthTokens;

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<AuthTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<AuthTokens>> {
        Ok(self.tokens.read().await.clone())
    }

    async fn set(&self, tokens: AuthTokens) -> Result<()> {
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.get().await.unwrap().is_none());

        store.set(AuthTokens::new("a1")).await.unwrap();
        assert_eq!(store.get().await.unwrap().unwrap().access_token(), "a1");

        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
    }
}
