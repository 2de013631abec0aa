//! `/auth` endpoints. Successful sign-ins persist tokens to the client's store.

use serde::{Deserialize, Serialize};

use super::{ApiRequest, Client};
use crate::auth::AuthTokens;
use crate::types::{AuthResponse, GoogleAuthUrl, MessageResponse, RegisterRequest, User};
use crate::{Error, Result};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct RefreshResponse {
    pub access_token: String,
}

pub struct AuthClient<'a> {
    client: &'a Client,
}

impl<'a> AuthClient<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::invalid_request("email and password are required"));
        }
        let request = ApiRequest::post(["auth", "login"]).json(&LoginRequest {
            email: email.trim(),
            password,
        })?;
        self.sign_in(request).await
    }

    pub async fn register(&self, registration: RegisterRequest) -> Result<AuthResponse> {
        if registration.email.trim().is_empty() {
            return Err(Error::invalid_request("email is required"));
        }
        let request = ApiRequest::post(["auth", "register"]).json(&registration)?;
        self.sign_in(request).await
    }

    pub async fn me(&self) -> Result<User> {
        self.client.execute(ApiRequest::get(["auth", "me"])).await
    }

    /// Exchanges the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<AuthTokens> {
        let tokens = self
            .client
            .token_store()
            .get()
            .await?
            .ok_or_else(|| Error::auth("not signed in"))?;
        self.client.refresh_tokens(&tokens).await
    }

    /// Notifies the server, then forgets the local session whatever the outcome.
    pub async fn logout(&self) -> Result<()> {
        let server: Result<MessageResponse> =
            self.client.execute(ApiRequest::post(["auth", "logout"])).await;
        self.client.token_store().clear().await?;
        server.map(|_| ())
    }

    pub async fn is_signed_in(&self) -> Result<bool> {
        Ok(self.client.token_store().get().await?.is_some())
    }

    /// Google consent URL plus the CSRF `state` to compare on callback.
    pub async fn google_auth_url(&self) -> Result<GoogleAuthUrl> {
        self.client
            .execute_public(ApiRequest::get(["auth", "google"]))
            .await
    }

    pub async fn google_callback(&self, code: &str, state: &str) -> Result<AuthResponse> {
        if code.is_empty() {
            return Err(Error::invalid_request("authorization code is required"));
        }
        let request = ApiRequest::get(["auth", "google", "callback"])
            .query("code", code)
            .query("state", state);
        self.sign_in(request).await
    }

    async fn sign_in(&self, request: ApiRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self.client.execute_public(request).await?;
        self.client.token_store().set(response.tokens()).await?;
        tracing::debug!(user_id = %response.user.id, "signed in");
        Ok(response)
    }
}
