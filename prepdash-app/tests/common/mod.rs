//! Shared test support: an in-memory platform API that records every
//! call it receives and can be told to fail specific operations.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;

use prepdash_api::{LoginPayload, PlatformApi, RefreshPayload, UnlockedExam, UserDetail};
use prepdash_core::{ErrorContext, PrepdashError, PrepdashResult};

/// Build an unsigned JWT whose payload carries the given `exp` claim
/// (epoch seconds). The `marker` claim makes tokens distinguishable.
pub fn make_token(exp_secs: i64, marker: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "exp": exp_secs, "jti": marker })
            .to_string()
            .as_bytes(),
    );
    format!("{}.{}.sig", header, payload)
}

/// An expiry comfortably beyond the refresh margin
pub fn future_exp() -> i64 {
    Utc::now().timestamp() + 3600
}

/// An expiry inside the 60-second refresh margin
pub fn imminent_exp() -> i64 {
    Utc::now().timestamp() + 30
}

pub struct MockPlatformApi {
    calls: Mutex<Vec<String>>,
    fail: Mutex<HashSet<&'static str>>,
    pub login_response: Mutex<LoginPayload>,
    pub refresh_response: Mutex<RefreshPayload>,
    pub unlocked_exams: Mutex<Vec<String>>,
}

impl MockPlatformApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: Mutex::new(HashSet::new()),
            login_response: Mutex::new(LoginPayload {
                access_token: Some(make_token(future_exp(), "login")),
                refresh_token: Some("refresh-1".to_string()),
                role: Some("admin".to_string()),
                id: Some("u1".to_string()),
                user: None,
            }),
            refresh_response: Mutex::new(RefreshPayload {
                access_token: Some(make_token(future_exp(), "refreshed")),
                refresh_token: None,
            }),
            unlocked_exams: Mutex::new(Vec::new()),
        }
    }

    /// Make the named operation fail with an API error
    pub fn fail_on(&self, op: &'static str) {
        self.fail.lock().unwrap().insert(op);
    }

    fn record(&self, entry: impl Into<String>) {
        self.calls.lock().unwrap().push(entry.into());
    }

    fn check(&self, op: &'static str) -> PrepdashResult<()> {
        if self.fail.lock().unwrap().contains(op) {
            return Err(PrepdashError::Api {
                message: format!("mock failure for {}", op),
                status: Some(500),
                source: None,
                context: ErrorContext::new("mock_platform_api"),
            });
        }
        Ok(())
    }

    pub fn recorded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .position(|c| c.starts_with(prefix))
    }
}

#[async_trait]
impl PlatformApi for MockPlatformApi {
    async fn login(&self, email: &str, _password: &str) -> PrepdashResult<LoginPayload> {
        self.record(format!("login:{}", email));
        self.check("login")?;
        Ok(self.login_response.lock().unwrap().clone())
    }

    async fn refresh_token(&self, refresh_token: &str) -> PrepdashResult<RefreshPayload> {
        self.record(format!("refresh:{}", refresh_token));
        self.check("refresh")?;
        Ok(self.refresh_response.lock().unwrap().clone())
    }

    async fn update_user_role(
        &self,
        _token: &str,
        user_id: &str,
        role: &str,
    ) -> PrepdashResult<()> {
        self.record(format!("role:{}:{}", user_id, role));
        self.check("role")
    }

    async fn update_subscription(
        &self,
        _token: &str,
        user_id: &str,
        tier: &str,
    ) -> PrepdashResult<()> {
        self.record(format!("subscription:{}:{}", user_id, tier));
        self.check("subscription")
    }

    async fn update_permissions(
        &self,
        _token: &str,
        user_id: &str,
        permissions: &[String],
    ) -> PrepdashResult<()> {
        self.record(format!("permissions:{}:{}", user_id, permissions.join(",")));
        self.check("permissions")
    }

    async fn update_user_status(
        &self,
        _token: &str,
        user_id: &str,
        status: &str,
    ) -> PrepdashResult<()> {
        self.record(format!("status:{}:{}", user_id, status));
        self.check("status")
    }

    async fn set_temporary_password(
        &self,
        _token: &str,
        user_id: &str,
        _password: &str,
    ) -> PrepdashResult<()> {
        self.record(format!("password:{}", user_id));
        self.check("password")
    }

    async fn unlock_exam(&self, _token: &str, exam_id: &str, user_id: &str) -> PrepdashResult<()> {
        self.record(format!("unlock:{}:{}", exam_id, user_id));
        self.check("unlock")
    }

    async fn get_user(&self, _token: &str, user_id: &str) -> PrepdashResult<UserDetail> {
        self.record(format!("get_user:{}", user_id));
        self.check("get_user")?;

        let unlocked = self
            .unlocked_exams
            .lock()
            .unwrap()
            .iter()
            .map(|id| UnlockedExam {
                exam_id: Some(id.clone()),
            })
            .collect();

        Ok(UserDetail {
            id: user_id.to_string(),
            email: Some("user@example.com".to_string()),
            name: Some("Test User".to_string()),
            role: Some("user".to_string()),
            subscription_tier: Some("starter".to_string()),
            status: Some("active".to_string()),
            sub_admin_permissions: Vec::new(),
            unlocked_exams: unlocked,
        })
    }
}
