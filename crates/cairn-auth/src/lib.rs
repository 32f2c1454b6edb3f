//! Session, token lifecycle, and Google OAuth for Cairn.

pub mod foreground;
pub mod google;
pub mod refresh;
pub mod session;
pub mod token_store;
pub mod warning;

pub use foreground::{AppState, ForegroundMonitor};
pub use google::{GoogleAuth, GoogleTokenResponse};
pub use refresh::{RefreshError, RefreshedToken, TokenRefresher, TOKEN_EXPIRY_BUFFER_MS};
pub use session::{Session, SessionHandle, User};
pub use token_store::{
    store_for_platform, KeyringTokenStore, MemoryTokenStore, TokenStore, TokenStoreError,
    WebTokenStore, REFRESH_TOKEN_KEY,
};
pub use warning::{expiry_warning, TokenWarning};
