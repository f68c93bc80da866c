//! Session token lifecycle: reuse, proactive refresh, failure flagging

mod common;

use std::sync::Arc;

use common::{future_exp, imminent_exp, make_token, MockPlatformApi};
use prepdash_api::{LoginPayload, RefreshPayload};
use prepdash_app::{token_expiry_ms, AdminError, Session, SessionManager};
use prepdash_core::Role;

fn session_for(access_token: String, refresh_token: Option<&str>) -> Session {
    Session {
        user_id: "u1".to_string(),
        email: None,
        role: Role::Admin,
        access_token_expires_at: token_expiry_ms(&access_token),
        access_token,
        refresh_token: refresh_token.map(String::from),
        error: None,
    }
}

#[tokio::test]
async fn fresh_token_is_reused_without_network_calls() {
    let api = Arc::new(MockPlatformApi::new());
    let manager = SessionManager::new(api.clone());

    let original = make_token(future_exp(), "fresh");
    let mut session = session_for(original.clone(), Some("refresh-1"));

    let token = manager.get_valid_access_token(&mut session).await;

    assert_eq!(token, original);
    assert_eq!(api.total_calls(), 0);
    assert!(session.error.is_none());
}

#[tokio::test]
async fn token_inside_margin_triggers_exactly_one_refresh() {
    let api = Arc::new(MockPlatformApi::new());
    let manager = SessionManager::new(api.clone());

    let original = make_token(imminent_exp(), "old");
    let mut session = session_for(original.clone(), Some("refresh-1"));

    let token = manager.get_valid_access_token(&mut session).await;

    assert_eq!(api.count("refresh"), 1);
    assert_eq!(api.total_calls(), 1);
    assert_ne!(token, original);
    assert_eq!(session.access_token, token);
    // Identity survives the refresh untouched
    assert_eq!(session.user_id, "u1");
    assert_eq!(session.role, Role::Admin);
    // Expiry recomputed from the new token
    assert_eq!(
        session.access_token_expires_at,
        token_expiry_ms(&session.access_token)
    );
}

#[tokio::test]
async fn undecodable_expiry_is_treated_as_stale() {
    let api = Arc::new(MockPlatformApi::new());
    let manager = SessionManager::new(api.clone());

    // Not a decodable JWT; expiry is unknown
    let mut session = session_for("garbage-token".to_string(), Some("refresh-1"));
    assert_eq!(session.access_token_expires_at, None);

    manager.get_valid_access_token(&mut session).await;

    assert_eq!(api.count("refresh"), 1);
}

#[tokio::test]
async fn stale_token_without_refresh_token_is_returned_as_is() {
    let api = Arc::new(MockPlatformApi::new());
    let manager = SessionManager::new(api.clone());

    let stale = make_token(imminent_exp(), "stale");
    let mut session = session_for(stale.clone(), None);

    let token = manager.get_valid_access_token(&mut session).await;

    // No local rejection; the backend's 401 is the caller's signal
    assert_eq!(token, stale);
    assert_eq!(api.total_calls(), 0);
    assert!(session.error.is_none());
}

#[tokio::test]
async fn refresh_failure_flags_session_and_stops_further_attempts() {
    let api = Arc::new(MockPlatformApi::new());
    api.fail_on("refresh");
    let manager = SessionManager::new(api.clone());

    let stale = make_token(imminent_exp(), "stale");
    let mut session = session_for(stale.clone(), Some("refresh-1"));

    let token = manager.get_valid_access_token(&mut session).await;

    // Session retained but flagged; token unchanged
    assert_eq!(token, stale);
    assert!(session.is_errored());
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(api.count("refresh"), 1);

    // An errored session is not auto-refreshed again
    manager.get_valid_access_token(&mut session).await;
    assert_eq!(api.count("refresh"), 1);
}

#[tokio::test]
async fn refresh_response_without_token_counts_as_failure() {
    let api = Arc::new(MockPlatformApi::new());
    *api.refresh_response.lock().unwrap() = RefreshPayload {
        access_token: None,
        refresh_token: None,
    };
    let manager = SessionManager::new(api.clone());

    let stale = make_token(imminent_exp(), "stale");
    let mut session = session_for(stale.clone(), Some("refresh-1"));

    manager.get_valid_access_token(&mut session).await;

    assert!(session.is_errored());
    assert_eq!(session.access_token, stale);
}

#[tokio::test]
async fn refresh_keeps_old_refresh_token_unless_rotated() {
    let api = Arc::new(MockPlatformApi::new());
    let manager = SessionManager::new(api.clone());

    // Server does not rotate
    let mut session = session_for(make_token(imminent_exp(), "a"), Some("refresh-1"));
    manager.refresh(&mut session).await;
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));

    // Server rotates
    *api.refresh_response.lock().unwrap() = RefreshPayload {
        access_token: Some(make_token(future_exp(), "rotated")),
        refresh_token: Some("refresh-2".to_string()),
    };
    let mut session = session_for(make_token(imminent_exp(), "b"), Some("refresh-1"));
    manager.refresh(&mut session).await;
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-2"));
    assert!(session.error.is_none());
}

#[tokio::test]
async fn authenticate_builds_session_from_login_payload() {
    let api = Arc::new(MockPlatformApi::new());
    let manager = SessionManager::new(api.clone());

    let session = manager.authenticate("admin@example.com", "hunter2").await.unwrap();

    assert_eq!(session.user_id, "u1");
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert!(session.error.is_none());
    // Expiry derived from the returned token, never set independently
    assert_eq!(
        session.access_token_expires_at,
        token_expiry_ms(&session.access_token)
    );
    assert_eq!(api.count("login"), 1);
}

#[tokio::test]
async fn rejected_login_fails_with_invalid_credentials() {
    let api = Arc::new(MockPlatformApi::new());
    api.fail_on("login");
    let manager = SessionManager::new(api.clone());

    let result = manager.authenticate("admin@example.com", "wrong").await;
    assert!(matches!(result, Err(AdminError::InvalidCredentials)));
}

#[tokio::test]
async fn login_payload_without_token_fails_with_invalid_credentials() {
    let api = Arc::new(MockPlatformApi::new());
    *api.login_response.lock().unwrap() = LoginPayload {
        access_token: None,
        refresh_token: None,
        role: None,
        id: None,
        user: None,
    };
    let manager = SessionManager::new(api.clone());

    let result = manager.authenticate("admin@example.com", "hunter2").await;
    assert!(matches!(result, Err(AdminError::InvalidCredentials)));
}
