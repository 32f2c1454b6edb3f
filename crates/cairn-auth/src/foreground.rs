//! Foreground reconciliation.
//!
//! Checks token validity when the app returns to the foreground, so a
//! session that went stale in the background is torn down before the UI
//! fires calendar requests against it.

use crate::refresh::TokenRefresher;

/// Application lifecycle state as reported by the platform shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

/// Watches lifecycle transitions and validates the session on each
/// background→active edge. Backgrounding and active→active changes are
/// ignored.
pub struct ForegroundMonitor {
    previous: AppState,
    refresher: TokenRefresher,
}

impl ForegroundMonitor {
    pub fn new(refresher: TokenRefresher) -> Self {
        Self {
            previous: AppState::Active,
            refresher,
        }
    }

    /// Feed a lifecycle transition from the platform shell.
    pub async fn on_state_change(&mut self, next: AppState) {
        let was_background = matches!(self.previous, AppState::Inactive | AppState::Background);
        self.previous = next;

        if !was_background || next != AppState::Active {
            return;
        }

        let session = self.refresher.session().clone();
        if !session.is_authenticated() {
            return;
        }

        if self.refresher.valid_access_token().await.is_none() {
            tracing::info!("Session invalid after foregrounding, logging out");
            session.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::session::SessionHandle;
    use crate::token_store::MemoryTokenStore;
    use std::sync::Arc;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    #[tokio::test]
    async fn test_foreground_with_failed_refresh_clears_session() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let session = SessionHandle::in_memory();
        session.set_session("stale", Some(now_ms() - 1000), None);

        let refresher = TokenRefresher::with_endpoint(
            "client123",
            session.clone(),
            Arc::new(MemoryTokenStore::with_token("rt")),
            mock_server.uri(),
        );
        let mut monitor = ForegroundMonitor::new(refresher);

        monitor.on_state_change(AppState::Background).await;
        monitor.on_state_change(AppState::Active).await;

        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_foreground_while_unauthenticated_makes_no_refresh_attempt() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let refresher = TokenRefresher::with_endpoint(
            "client123",
            SessionHandle::in_memory(),
            Arc::new(MemoryTokenStore::with_token("rt")),
            mock_server.uri(),
        );
        let mut monitor = ForegroundMonitor::new(refresher);

        monitor.on_state_change(AppState::Background).await;
        monitor.on_state_change(AppState::Active).await;
    }

    #[tokio::test]
    async fn test_valid_session_survives_foregrounding() {
        let session = SessionHandle::in_memory();
        session.set_session("fresh", Some(now_ms() + 3_600_000), None);

        let refresher = TokenRefresher::new(
            "client123",
            session.clone(),
            Arc::new(MemoryTokenStore::with_token("rt")),
        );
        let mut monitor = ForegroundMonitor::new(refresher);

        monitor.on_state_change(AppState::Inactive).await;
        monitor.on_state_change(AppState::Active).await;

        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_no_check_without_background_edge() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let session = SessionHandle::in_memory();
        session.set_session("stale", Some(now_ms() - 1000), None);

        let refresher = TokenRefresher::with_endpoint(
            "client123",
            session.clone(),
            Arc::new(MemoryTokenStore::with_token("rt")),
            mock_server.uri(),
        );
        let mut monitor = ForegroundMonitor::new(refresher);

        // Active → active: not a background edge, no validity check.
        monitor.on_state_change(AppState::Active).await;

        assert!(session.is_authenticated());
    }
}
