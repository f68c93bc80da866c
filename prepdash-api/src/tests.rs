//! Tests for the API boundary

use serde_json::json;

use crate::client::{create_http_client, ApiClientConfig};
use crate::models::{unwrap_envelope, LoginPayload, RefreshPayload, UserDetail};

#[test]
fn test_api_client_config_creation() {
    let config = ApiClientConfig::new("https://platform.example.com/");
    assert_eq!(config.base_url, "https://platform.example.com");
    assert_eq!(config.timeout_seconds, 15);

    // Operator-supplied URLs may already carry the API prefix
    let config = ApiClientConfig::new("https://platform.example.com/api/v1");
    assert_eq!(config.base_url, "https://platform.example.com");

    let config = ApiClientConfig::default()
        .with_header("X-Custom-Header".to_string(), "test-value".to_string())
        .with_timeout(60);
    assert_eq!(config.timeout_seconds, 60);
    assert_eq!(
        config.headers.get("X-Custom-Header"),
        Some(&"test-value".to_string())
    );
}

#[tokio::test]
async fn test_http_client_creation() {
    let config = ApiClientConfig::default();
    let client = create_http_client(&config);
    assert!(client.is_ok());
}

#[test]
fn test_envelope_unwrapping_nested() {
    let nested = json!({
        "success": true,
        "data": { "accessToken": "abc", "refreshToken": "def" },
        "message": "ok"
    });

    let payload: RefreshPayload = serde_json::from_value(unwrap_envelope(nested)).unwrap();
    assert_eq!(payload.access_token.as_deref(), Some("abc"));
    assert_eq!(payload.refresh_token.as_deref(), Some("def"));
}

#[test]
fn test_envelope_unwrapping_raw() {
    let raw = json!({ "accessToken": "abc" });

    let payload: RefreshPayload = serde_json::from_value(unwrap_envelope(raw)).unwrap();
    assert_eq!(payload.access_token.as_deref(), Some("abc"));
    assert_eq!(payload.refresh_token, None);
}

#[test]
fn test_envelope_null_data_is_not_an_envelope() {
    let value = json!({ "accessToken": "abc", "data": null });

    let payload: RefreshPayload = serde_json::from_value(unwrap_envelope(value)).unwrap();
    assert_eq!(payload.access_token.as_deref(), Some("abc"));
}

#[test]
fn test_login_payload_user_id_fallback() {
    let top_level: LoginPayload = serde_json::from_value(json!({
        "_id": "u1",
        "accessToken": "tok",
        "refreshToken": "ref",
        "role": "admin"
    }))
    .unwrap();
    assert_eq!(top_level.user_id(), Some("u1"));

    let nested: LoginPayload = serde_json::from_value(json!({
        "accessToken": "tok",
        "user": { "_id": "u2", "email": "a@b.c" }
    }))
    .unwrap();
    assert_eq!(nested.user_id(), Some("u2"));
}

#[test]
fn test_user_detail_unlocked_exam_ids() {
    let detail: UserDetail = serde_json::from_value(json!({
        "_id": "u1",
        "role": "user",
        "subscriptionTier": "starter",
        "status": "active",
        "unlockedExams": [
            { "examId": "exam-a" },
            { "examId": "exam-b" },
            { "other": "junk" }
        ]
    }))
    .unwrap();

    assert_eq!(detail.unlocked_exam_ids(), vec!["exam-a", "exam-b"]);
}
