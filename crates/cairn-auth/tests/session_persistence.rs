//! Session persistence across process restarts.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use cairn_auth::{SessionHandle, User};
use cairn_core::StateStore;

fn sample_user() -> User {
    User {
        id: "u1".to_string(),
        email: "user@example.com".to_string(),
        name: "Test User".to_string(),
        picture: Some("https://example.com/p.png".to_string()),
    }
}

#[test]
fn session_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let store = StateStore::at(tmp.path()).unwrap();

    {
        let session = SessionHandle::with_store(store.clone());
        session.set_session("token", Some(123_456), Some(sample_user()));
    }

    let session = SessionHandle::with_store(store);
    let state = session.snapshot();

    assert!(state.is_authenticated);
    assert_eq!(state.access_token.as_deref(), Some("token"));
    assert_eq!(state.expires_at, Some(123_456));
    assert_eq!(state.user, Some(sample_user()));
}

#[test]
fn persisted_shape_matches_wire_keys() {
    let tmp = tempfile::tempdir().unwrap();
    let store = StateStore::at(tmp.path()).unwrap();

    let session = SessionHandle::with_store(store.clone());
    session.set_session("token", Some(42), None);

    let raw: serde_json::Value = store.load("cairn-auth").unwrap().unwrap();
    assert_eq!(raw["accessToken"], "token");
    assert_eq!(raw["expiresAt"], 42);
    assert_eq!(raw["isAuthenticated"], true);
    assert!(raw.get("isLoading").is_none());
}

#[test]
fn logout_persists_cleared_state() {
    let tmp = tempfile::tempdir().unwrap();
    let store = StateStore::at(tmp.path()).unwrap();

    {
        let session = SessionHandle::with_store(store.clone());
        session.set_session("token", Some(42), Some(sample_user()));
        session.clear();
    }

    let session = SessionHandle::with_store(store);
    let state = session.snapshot();

    assert!(!state.is_authenticated);
    assert!(state.access_token.is_none());
    assert!(state.user.is_none());
}
