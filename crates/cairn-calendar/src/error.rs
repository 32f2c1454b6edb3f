//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    /// The session's access credential is gone and cannot be refreshed.
    /// Raising this has already torn the session down.
    #[error("Session expired. Please sign in again.")]
    AuthExpired,

    /// Non-2xx API response other than 401.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        /// Parsed error body, when the server sent valid JSON.
        details: Option<serde_json::Value>,
    },

    /// No response obtained at all.
    #[error("{context}: {source}")]
    Network {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl CalendarError {
    pub(crate) fn api(status: reqwest::StatusCode, details: Option<serde_json::Value>) -> Self {
        Self::Api {
            status: status.as_u16(),
            message: format!(
                "API request failed: {}",
                status.canonical_reason().unwrap_or("unknown status")
            ),
            details,
        }
    }

    pub(crate) fn network(context: &'static str, source: reqwest::Error) -> Self {
        Self::Network { context, source }
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthExpired => "Your session has expired. Please sign in again.".to_string(),
            Self::Api { message, .. } => format!("Calendar error: {}", message),
            Self::Network { .. } => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether this error should redirect the user to sign-in.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Whether this error is worth a retry affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Network { .. })
    }
}
