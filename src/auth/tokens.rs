//! Access/refresh token pair.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Bearer credentials issued by `/auth/login`, `/auth/register` or the
/// Google callback. `Debug` never prints the token values.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "StoredTokens", into = "StoredTokens")]
pub struct AuthTokens {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
}

impl AuthTokens {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: None,
        }
    }

    pub fn with_refresh(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(SecretString::from(refresh_token.into()));
        self
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|s| s.expose_secret())
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token().is_some_and(|t| !t.is_empty())
    }

    /// Same refresh token, new access token.
    pub fn rotated(&self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: self.refresh_token.clone(),
        }
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token())
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"[redacted]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// On-disk shape. Secrets are exposed only for the duration of serialization.
#[derive(Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl From<StoredTokens> for AuthTokens {
    fn from(stored: StoredTokens) -> Self {
        let tokens = AuthTokens::new(stored.access_token);
        match stored.refresh_token {
            Some(refresh) => tokens.with_refresh(refresh),
            None => tokens,
        }
    }
}

impl From<AuthTokens> for StoredTokens {
    fn from(tokens: AuthTokens) -> Self {
        StoredTokens {
            access_token: tokens.access_token().to_string(),
            refresh_token: tokens.refresh_token().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let tokens = AuthTokens::new("eyJ.access").with_refresh("eyJ.refresh");
        let debug = format!("{:?}", tokens);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_serde_shape() {
        let tokens = AuthTokens::new("a1").with_refresh("r1");
        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"access_token": "a1", "refresh_token": "r1"})
        );

        let parsed: AuthTokens = serde_json::from_str(r#"{"access_token":"a2"}"#).unwrap();
        assert_eq!(parsed.access_token(), "a2");
        assert!(!parsed.can_refresh());
    }

    #[test]
    fn test_rotated_keeps_refresh_token() {
        let tokens = AuthTokens::new("old").with_refresh("r1");
        let rotated = tokens.rotated("new");
        assert_eq!(rotated.access_token(), "new");
        assert_eq!(rotated.refresh_token(), Some("r1"));
        assert_eq!(rotated.bearer(), "Bearer new");
    }
}
