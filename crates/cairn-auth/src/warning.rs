//! Session-expiry warning for platforms without silent refresh.

use crate::session::Session;

const WARNING_THRESHOLD_MS: i64 = 10 * 60 * 1000;

/// Expiry countdown state for the UI banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenWarning {
    pub show_warning: bool,
    pub minutes_remaining: Option<i64>,
}

/// Compute the warning state at `now_ms`.
///
/// Platforms with silent refresh never warn; neither do sessions that
/// are unauthenticated or carry no expiry.
pub fn expiry_warning(session: &Session, supports_refresh: bool, now_ms: i64) -> TokenWarning {
    if supports_refresh || !session.is_authenticated {
        return TokenWarning::default();
    }
    let Some(expires_at) = session.expires_at else {
        return TokenWarning::default();
    };

    let time_remaining = expires_at - now_ms;
    if time_remaining > WARNING_THRESHOLD_MS {
        return TokenWarning::default();
    }

    TokenWarning {
        show_warning: true,
        minutes_remaining: Some((time_remaining / 60_000).max(0)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn authed_session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: Some("token".to_string()),
            expires_at,
            user: None,
            is_loading: false,
            is_authenticated: true,
        }
    }

    #[test]
    fn test_refreshable_platform_never_warns() {
        let session = authed_session(Some(5 * 60 * 1000));
        assert_eq!(expiry_warning(&session, true, 0), TokenWarning::default());
    }

    #[test]
    fn test_warns_inside_threshold() {
        let session = authed_session(Some(9 * 60 * 1000));
        let warning = expiry_warning(&session, false, 0);
        assert!(warning.show_warning);
        assert_eq!(warning.minutes_remaining, Some(9));
    }

    #[test]
    fn test_no_warning_outside_threshold() {
        let session = authed_session(Some(11 * 60 * 1000));
        assert_eq!(expiry_warning(&session, false, 0), TokenWarning::default());
    }

    #[test]
    fn test_expired_session_clamps_to_zero_minutes() {
        let session = authed_session(Some(-5000));
        let warning = expiry_warning(&session, false, 0);
        assert!(warning.show_warning);
        assert_eq!(warning.minutes_remaining, Some(0));
    }

    #[test]
    fn test_unauthenticated_never_warns() {
        let session = Session::default();
        assert_eq!(expiry_warning(&session, false, 0), TokenWarning::default());
    }
}
