//! Wire models for the platform REST API

use serde::Deserialize;
use serde_json::Value;

/// Unwrap the platform's optional response envelope.
///
/// Endpoints answer either with the payload directly or with the payload
/// nested under a `data` field; both shapes must be accepted.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                // A null or scalar `data` field is not an envelope
                map.insert("data".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Successful login response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub user: Option<UserSummary>,
}

impl LoginPayload {
    /// Identifier of the authenticated user, wherever the backend put it
    pub fn user_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.user.as_ref().and_then(|u| u.id.as_deref()))
    }
}

/// Embedded user record in auth responses
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Token refresh response; `refresh_token` is only present when the
/// server rotated it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Authoritative user record as returned by the user detail endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub subscription_tier: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub sub_admin_permissions: Vec<String>,
    #[serde(default)]
    pub unlocked_exams: Vec<UnlockedExam>,
}

impl UserDetail {
    /// Exam identifiers already unlocked for this user
    pub fn unlocked_exam_ids(&self) -> Vec<String> {
        self.unlocked_exams
            .iter()
            .filter_map(|e| e.exam_id.clone())
            .collect()
    }
}

/// Entry in a user's unlocked exam list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedExam {
    pub exam_id: Option<String>,
}
