//! Platform-aware persistence for the OAuth refresh credential.
//!
//! - iOS/Android/desktop: the OS keyring, under a fixed entry.
//! - Web: a no-op backend, since the web OAuth flow never issues a
//!   refresh token. This is a capability gate, not an error.

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

use cairn_core::Platform;

/// Fixed storage key for the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "cairn_refresh_token";

const KEYRING_SERVICE: &str = "cairn";

/// Storage backend failures are fatal; they are not recovered locally.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("secure storage unavailable: {0}")]
    Backend(String),
}

/// Storage for the long-lived refresh credential.
pub trait TokenStore: Send + Sync {
    /// Whether this platform has a refresh path at all.
    fn supports_refresh(&self) -> bool {
        true
    }

    fn store(&self, token: &str) -> Result<(), TokenStoreError>;

    fn retrieve(&self) -> Result<Option<String>, TokenStoreError>;

    fn remove(&self) -> Result<(), TokenStoreError>;
}

/// OS keyring-backed store (macOS Keychain, Secret Service, Credential
/// Manager).
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry(&self) -> Result<keyring::Entry, TokenStoreError> {
        keyring::Entry::new(KEYRING_SERVICE, REFRESH_TOKEN_KEY)
            .map_err(|e| TokenStoreError::Backend(e.to_string()))
    }
}

impl TokenStore for KeyringTokenStore {
    fn store(&self, token: &str) -> Result<(), TokenStoreError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| TokenStoreError::Backend(e.to_string()))
    }

    fn retrieve(&self) -> Result<Option<String>, TokenStoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(TokenStoreError::Backend(e.to_string())),
        }
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(TokenStoreError::Backend(e.to_string())),
        }
    }
}

/// No-op store for the web platform.
pub struct WebTokenStore;

impl TokenStore for WebTokenStore {
    fn supports_refresh(&self) -> bool {
        false
    }

    fn store(&self, _token: &str) -> Result<(), TokenStoreError> {
        Ok(())
    }

    fn retrieve(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(None)
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        Ok(())
    }
}

/// In-memory store for tests and embedders without a keyring.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn store(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn retrieve(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().clone())
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        *self.token.lock() = None;
        Ok(())
    }
}

/// Select the store matching the configured platform.
pub fn store_for_platform(platform: Platform) -> Arc<dyn TokenStore> {
    match platform {
        Platform::Web => Arc::new(WebTokenStore),
        Platform::Ios | Platform::Android => Arc::new(KeyringTokenStore),
    }
}
