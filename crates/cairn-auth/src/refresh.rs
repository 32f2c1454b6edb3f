//! Access-token refresh engine.
//!
//! Exchanges the stored refresh credential at Google's token endpoint,
//! de-duplicating concurrent refreshes: overlapping callers await one
//! shared in-flight exchange and all observe its outcome. The shared
//! slot is cleared when the exchange settles, so a later call starts a
//! fresh exchange.

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::session::SessionHandle;
use crate::token_store::TokenStore;

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before expiry.
pub const TOKEN_EXPIRY_BUFFER_MS: i64 = 5 * 60 * 1000;

/// Refresh failure. Cloneable so one in-flight outcome can be handed to
/// every waiting caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error("No refresh token available")]
    NoRefreshToken,

    /// The authorization server reported the refresh credential as
    /// revoked or invalid; the stored credential has been deleted.
    #[error("{0}")]
    Revoked(String),

    /// Transient server-side failure; the stored credential is kept.
    #[error("{0}")]
    Failed(String),

    #[error("Token refresh request failed: {0}")]
    Network(String),

    #[error("secure storage unavailable: {0}")]
    Storage(String),
}

impl RefreshError {
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::Revoked(_))
    }
}

/// Outcome of a successful refresh exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

#[derive(Debug, Deserialize)]
struct TokenEndpointBody {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
    error_description: Option<String>,
}

type SharedRefresh = Shared<BoxFuture<'static, Result<RefreshedToken, RefreshError>>>;

struct RefresherInner {
    http: reqwest::Client,
    client_id: String,
    token_endpoint: String,
    session: SessionHandle,
    store: Arc<dyn TokenStore>,
    in_flight: Mutex<Option<SharedRefresh>>,
}

/// Single-flight token refresher bound to the session and token store.
#[derive(Clone)]
pub struct TokenRefresher {
    inner: Arc<RefresherInner>,
}

impl TokenRefresher {
    pub fn new(
        client_id: impl Into<String>,
        session: SessionHandle,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self::with_endpoint(client_id, session, store, GOOGLE_TOKEN_ENDPOINT)
    }

    pub(crate) fn with_endpoint(
        client_id: impl Into<String>,
        session: SessionHandle,
        store: Arc<dyn TokenStore>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(RefresherInner {
                http: reqwest::Client::new(),
                client_id: client_id.into(),
                token_endpoint: token_endpoint.into(),
                session,
                store,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// The session this refresher updates.
    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }

    /// Whether the underlying platform has a refresh path.
    pub fn can_refresh(&self) -> bool {
        self.inner.store.supports_refresh()
    }

    /// Refresh the access token using the stored refresh credential.
    ///
    /// Concurrent callers share one network exchange and receive the
    /// identical result.
    pub async fn refresh_access_token(&self) -> Result<RefreshedToken, RefreshError> {
        let fut = {
            let mut slot = self.inner.in_flight.lock();
            match slot.clone() {
                Some(fut) => fut,
                None => {
                    let inner = Arc::clone(&self.inner);
                    let fut: SharedRefresh = async move {
                        let result = inner.exchange().await;
                        *inner.in_flight.lock() = None;
                        result
                    }
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };

        fut.await
    }

    /// Get a valid access token, refreshing if necessary.
    ///
    /// On platforms without a refresh path, an expired token yields
    /// `None` while a soon-to-expire one is still served. On
    /// refreshable platforms a failed refresh yields `None`; callers
    /// treat that as logged out.
    pub async fn valid_access_token(&self) -> Option<String> {
        let snapshot = self.inner.session.snapshot();

        if !snapshot.is_authenticated {
            return None;
        }
        let expires_at = snapshot.expires_at;
        let access_token = snapshot.access_token?;

        let now = chrono::Utc::now().timestamp_millis();
        let is_expired = expires_at.map_or(true, |at| now >= at);
        let needs_refresh =
            is_expired || expires_at.map_or(true, |at| now >= at - TOKEN_EXPIRY_BUFFER_MS);

        if !needs_refresh {
            return Some(access_token);
        }

        if !self.can_refresh() {
            return if is_expired { None } else { Some(access_token) };
        }

        match self.refresh_access_token().await {
            Ok(refreshed) => {
                self.inner
                    .session
                    .update_tokens(&refreshed.access_token, refreshed.expires_at);
                Some(refreshed.access_token)
            }
            Err(err) => {
                tracing::warn!("Token refresh failed: {err}");
                None
            }
        }
    }
}

impl RefresherInner {
    #[tracing::instrument(skip(self), level = "info")]
    async fn exchange(&self) -> Result<RefreshedToken, RefreshError> {
        let refresh_token = self
            .store
            .retrieve()
            .map_err(|e| RefreshError::Storage(e.to_string()))?
            .ok_or(RefreshError::NoRefreshToken)?;

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| RefreshError::Network(e.to_string()))?;

        let status = response.status();
        let body: TokenEndpointBody = response
            .json()
            .await
            .map_err(|e| RefreshError::Failed(format!("Invalid token response: {e}")))?;

        if !status.is_success() {
            // A revoked refresh token is gone for good; delete it so the
            // next sign-in starts clean. Any other error may be transient.
            if body.error.as_deref() == Some("invalid_grant") {
                self.store
                    .remove()
                    .map_err(|e| RefreshError::Storage(e.to_string()))?;
                return Err(RefreshError::Revoked(
                    body.error_description
                        .unwrap_or_else(|| "Refresh token revoked".to_string()),
                ));
            }
            return Err(RefreshError::Failed(
                body.error_description
                    .unwrap_or_else(|| "Token refresh failed".to_string()),
            ));
        }

        // Token rotation: persist the replacement refresh token if issued.
        if let Some(rotated) = body.refresh_token {
            self.store
                .store(&rotated)
                .map_err(|e| RefreshError::Storage(e.to_string()))?;
        }

        let access_token = body
            .access_token
            .ok_or_else(|| RefreshError::Failed("Token response missing access_token".to_string()))?;

        let expires_in = body.expires_in.unwrap_or(3600);
        let expires_at =
            chrono::Utc::now().timestamp_millis() + (expires_in as i64) * 1000;

        tracing::info!("Access token refreshed");
        Ok(RefreshedToken {
            access_token,
            expires_at,
        })
    }
}
