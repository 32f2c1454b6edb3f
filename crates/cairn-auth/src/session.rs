//! Process-wide session state.
//!
//! The session holds the current access credential, its expiry, and the
//! signed-in user. It is mutated only through [`SessionHandle`], which
//! keeps `is_authenticated == access_token.is_some()` and writes the
//! persisted subset through on every change. The refresh credential is
//! never part of the session; it lives in the token store.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cairn_core::StateStore;

const SESSION_STATE_KEY: &str = "cairn-auth";

/// Authenticated user profile from Google OAuth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Current authentication state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub access_token: Option<String>,
    /// Epoch milliseconds when the access token becomes invalid.
    pub expires_at: Option<i64>,
    pub user: Option<User>,
    pub is_loading: bool,
    pub is_authenticated: bool,
}

impl Session {
    /// An absent expiry is treated as already expired.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now_ms >= expires_at,
            None => true,
        }
    }
}

/// Persisted subset of the session. The loading flag is transient and
/// the refresh credential lives only in the token store.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    access_token: Option<String>,
    expires_at: Option<i64>,
    user: Option<User>,
    is_authenticated: bool,
}

struct SessionInner {
    state: RwLock<Session>,
    store: Option<StateStore>,
}

/// Shared handle to the single session instance.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    /// A session with no persistence (tests, web).
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(Session::default()),
                store: None,
            }),
        }
    }

    /// A session hydrated from, and written through to, the given store.
    pub fn with_store(store: StateStore) -> Self {
        let persisted: PersistedSession = match store.load(SESSION_STATE_KEY) {
            Ok(Some(persisted)) => persisted,
            Ok(None) => PersistedSession::default(),
            Err(err) => {
                tracing::warn!("Failed to hydrate session: {err:#}");
                PersistedSession::default()
            }
        };

        let session = Session {
            is_authenticated: persisted.is_authenticated && persisted.access_token.is_some(),
            access_token: persisted.access_token,
            expires_at: persisted.expires_at,
            user: persisted.user,
            is_loading: false,
        };

        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(session),
                store: Some(store),
            }),
        }
    }

    /// Atomically set all auth fields and mark the session authenticated.
    pub fn set_session(
        &self,
        access_token: &str,
        expires_at: Option<i64>,
        user: Option<User>,
    ) {
        {
            let mut state = self.inner.state.write();
            state.access_token = Some(access_token.to_string());
            state.expires_at = expires_at;
            state.user = user;
            state.is_authenticated = true;
            state.is_loading = false;
        }
        self.persist();
    }

    /// Update the access credential in place, preserving the user.
    pub fn update_tokens(&self, access_token: &str, expires_at: i64) {
        {
            let mut state = self.inner.state.write();
            state.access_token = Some(access_token.to_string());
            state.expires_at = Some(expires_at);
            state.is_authenticated = true;
        }
        self.persist();
    }

    pub fn set_loading(&self, loading: bool) {
        self.inner.state.write().is_loading = loading;
    }

    /// Atomically null all auth fields and mark unauthenticated.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.write();
            *state = Session::default();
        }
        self.persist();
        tracing::info!("Session cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().is_authenticated
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp_millis();
        self.inner.state.read().is_expired_at(now)
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.state.read().access_token.clone()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Session {
        self.inner.state.read().clone()
    }

    fn persist(&self) {
        let Some(store) = &self.inner.store else { return };
        let persisted = {
            let state = self.inner.state.read();
            PersistedSession {
                access_token: state.access_token.clone(),
                expires_at: state.expires_at,
                user: state.user.clone(),
                is_authenticated: state.is_authenticated,
            }
        };
        if let Err(err) = store.save(SESSION_STATE_KEY, &persisted) {
            tracing::warn!("Failed to persist session: {err:#}");
        }
    }
}
