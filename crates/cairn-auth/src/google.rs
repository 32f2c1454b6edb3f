//! Google OAuth2 client for Calendar access.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::session::{SessionHandle, User};
use crate::token_store::{TokenStore, TokenStoreError};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

// Scopes for Calendar access and the signed-in profile
const GOOGLE_SCOPES: [&str; 5] = [
    "openid",
    "profile",
    "email",
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

pub struct GoogleAuth {
    client_id: String,
    http: reqwest::Client,
    session: SessionHandle,
    store: Arc<dyn TokenStore>,
    token_url: String,
    userinfo_url: String,
}

impl GoogleAuth {
    pub fn new(
        client_id: impl Into<String>,
        session: SessionHandle,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            http: reqwest::Client::new(),
            session,
            store,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_urls(mut self, token_url: &str, userinfo_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self.userinfo_url = userinfo_url.to_string();
        self
    }

    /// Generate authorization URL for the OAuth flow.
    /// Returns (url, state) where state should be verified on callback.
    pub fn authorization_url(&self, redirect_uri: &str) -> (String, String) {
        let state = uuid::Uuid::new_v4().to_string();
        let scopes = GOOGLE_SCOPES.join(" ");

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=offline&prompt=consent",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(&state),
        );

        (url, state)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// Cairn is registered as a public (mobile) client, so the exchange
    /// carries no client secret.
    #[tracing::instrument(skip(self, code), level = "info")]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .context("Failed to send token request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Token exchange failed: {}", error_text);
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .context("Failed to parse token response")
    }

    /// Get user info (profile) from an access token.
    #[tracing::instrument(skip(self, access_token), level = "info")]
    pub async fn fetch_user_info(&self, access_token: &str) -> Result<User> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to fetch user info")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("User info request failed: {}", error_text);
        }

        response.json::<User>().await.context("Failed to parse user info")
    }

    /// Complete sign-in from a token response: persist the refresh
    /// credential, fetch the profile, and populate the session.
    pub async fn complete_sign_in(&self, tokens: &GoogleTokenResponse) -> Result<()> {
        if let Some(refresh_token) = &tokens.refresh_token {
            self.store
                .store(refresh_token)
                .context("Failed to store refresh token")?;
        }

        let expires_at = tokens
            .expires_in
            .map(|secs| chrono::Utc::now().timestamp_millis() + (secs as i64) * 1000);

        let user = match self.fetch_user_info(&tokens.access_token).await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("Error fetching user info: {err:#}");
                None
            }
        };

        self.session
            .set_session(&tokens.access_token, expires_at, user);

        tracing::info!("Sign-in completed");
        Ok(())
    }

    /// Sign out: clear the session and delete the stored refresh credential.
    pub fn sign_out(&self) -> Result<(), TokenStoreError> {
        self.session.clear();
        self.store.remove()
    }
}
