//! Platform API trait and its reqwest implementation

use async_trait::async_trait;
use log::{debug, info};
use serde_json::json;

use prepdash_core::{ErrorContext, PrepdashError, PrepdashResult};

use crate::client::{create_http_client, handle_response_error, ApiClientConfig};
use crate::models::{unwrap_envelope, LoginPayload, RefreshPayload, UserDetail};

/// Boundary to the platform backend.
///
/// Every operation maps to exactly one HTTP call. Authenticated calls
/// take the bearer access token explicitly; token lifecycle is the
/// session manager's concern, not this trait's.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// `POST /api/v1/auth/login`
    async fn login(&self, email: &str, password: &str) -> PrepdashResult<LoginPayload>;

    /// `POST /api/v1/auth/refresh-token`
    async fn refresh_token(&self, refresh_token: &str) -> PrepdashResult<RefreshPayload>;

    /// `PATCH /api/v1/auth/users/{userId}/role`
    async fn update_user_role(&self, token: &str, user_id: &str, role: &str)
        -> PrepdashResult<()>;

    /// `PATCH /api/v1/user/{userId}/subscription`
    async fn update_subscription(
        &self,
        token: &str,
        user_id: &str,
        tier: &str,
    ) -> PrepdashResult<()>;

    /// `PATCH /api/v1/user/{userId}/permissions`
    async fn update_permissions(
        &self,
        token: &str,
        user_id: &str,
        permissions: &[String],
    ) -> PrepdashResult<()>;

    /// `PATCH /api/v1/user/{userId}/status`
    async fn update_user_status(
        &self,
        token: &str,
        user_id: &str,
        status: &str,
    ) -> PrepdashResult<()>;

    /// `PATCH /api/v1/user/{userId}/password`
    async fn set_temporary_password(
        &self,
        token: &str,
        user_id: &str,
        password: &str,
    ) -> PrepdashResult<()>;

    /// `POST /api/v1/payments/admin/exam/{examId}/unlock`
    async fn unlock_exam(&self, token: &str, exam_id: &str, user_id: &str) -> PrepdashResult<()>;

    /// `GET /api/v1/user/{userId}`
    async fn get_user(&self, token: &str, user_id: &str) -> PrepdashResult<UserDetail>;
}

/// Reqwest-backed platform client
pub struct RestClient {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl RestClient {
    /// Create a new platform client
    pub fn new(config: ApiClientConfig) -> PrepdashResult<Self> {
        let client = create_http_client(&config)?;

        info!("Created platform API client for {}", config.base_url);

        Ok(Self { client, config })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn request_error(&self, operation: &str, e: reqwest::Error) -> PrepdashError {
        if e.is_timeout() {
            PrepdashError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.config.timeout_seconds * 1000,
                context: ErrorContext::new("platform_api")
                    .with_operation(operation)
                    .with_suggestion("Check network connectivity"),
            }
        } else {
            PrepdashError::Network {
                message: format!("Request to platform API failed: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("platform_api").with_operation(operation),
            }
        }
    }

    /// Send a request, optionally authenticated, and fail on non-2xx
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
        operation: &str,
    ) -> PrepdashResult<reqwest::Response> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| self.request_error(operation, e))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, operation).await);
        }

        Ok(response)
    }

    /// Parse a JSON response body, unwrapping the optional `data` envelope
    async fn parse_enveloped<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> PrepdashResult<T> {
        let value: serde_json::Value =
            response.json().await.map_err(|e| PrepdashError::Api {
                message: format!("Failed to parse response body: {}", e),
                status: None,
                source: Some(Box::new(e)),
                context: ErrorContext::new("platform_api").with_operation(operation),
            })?;

        serde_json::from_value(unwrap_envelope(value)).map_err(PrepdashError::from)
    }
}

#[async_trait]
impl PlatformApi for RestClient {
    async fn login(&self, email: &str, password: &str) -> PrepdashResult<LoginPayload> {
        debug!("Logging in as {}", email);

        let request = self
            .client
            .post(self.endpoint_url("auth/login"))
            .json(&json!({ "email": email, "password": password }));

        let response = self.send(request, None, "login").await?;
        Self::parse_enveloped(response, "login").await
    }

    async fn refresh_token(&self, refresh_token: &str) -> PrepdashResult<RefreshPayload> {
        debug!("Refreshing access token");

        let request = self
            .client
            .post(self.endpoint_url("auth/refresh-token"))
            .json(&json!({ "refreshToken": refresh_token }));

        let response = self.send(request, None, "refresh_token").await?;
        Self::parse_enveloped(response, "refresh_token").await
    }

    async fn update_user_role(
        &self,
        token: &str,
        user_id: &str,
        role: &str,
    ) -> PrepdashResult<()> {
        debug!("Updating role for user {} to {}", user_id, role);

        let request = self
            .client
            .patch(self.endpoint_url(&format!("auth/users/{}/role", user_id)))
            .json(&json!({ "role": role }));

        self.send(request, Some(token), "update_user_role").await?;
        Ok(())
    }

    async fn update_subscription(
        &self,
        token: &str,
        user_id: &str,
        tier: &str,
    ) -> PrepdashResult<()> {
        debug!("Updating subscription for user {} to {}", user_id, tier);

        let request = self
            .client
            .patch(self.endpoint_url(&format!("user/{}/subscription", user_id)))
            .json(&json!({ "subscriptionTier": tier }));

        self.send(request, Some(token), "update_subscription")
            .await?;
        Ok(())
    }

    async fn update_permissions(
        &self,
        token: &str,
        user_id: &str,
        permissions: &[String],
    ) -> PrepdashResult<()> {
        debug!(
            "Updating permissions for user {} ({} entries)",
            user_id,
            permissions.len()
        );

        let request = self
            .client
            .patch(self.endpoint_url(&format!("user/{}/permissions", user_id)))
            .json(&json!({ "permissions": permissions }));

        self.send(request, Some(token), "update_permissions")
            .await?;
        Ok(())
    }

    async fn update_user_status(
        &self,
        token: &str,
        user_id: &str,
        status: &str,
    ) -> PrepdashResult<()> {
        debug!("Updating status for user {} to {}", user_id, status);

        let request = self
            .client
            .patch(self.endpoint_url(&format!("user/{}/status", user_id)))
            .json(&json!({ "status": status }));

        self.send(request, Some(token), "update_user_status")
            .await?;
        Ok(())
    }

    async fn set_temporary_password(
        &self,
        token: &str,
        user_id: &str,
        password: &str,
    ) -> PrepdashResult<()> {
        debug!("Setting temporary password for user {}", user_id);

        let request = self
            .client
            .patch(self.endpoint_url(&format!("user/{}/password", user_id)))
            .json(&json!({ "password": password }));

        self.send(request, Some(token), "set_temporary_password")
            .await?;
        Ok(())
    }

    async fn unlock_exam(&self, token: &str, exam_id: &str, user_id: &str) -> PrepdashResult<()> {
        debug!("Unlocking exam {} for user {}", exam_id, user_id);

        let request = self
            .client
            .post(self.endpoint_url(&format!("payments/admin/exam/{}/unlock", exam_id)))
            .json(&json!({ "userId": user_id }));

        self.send(request, Some(token), "unlock_exam").await?;
        Ok(())
    }

    async fn get_user(&self, token: &str, user_id: &str) -> PrepdashResult<UserDetail> {
        debug!("Fetching user record {}", user_id);

        let request = self.client.get(self.endpoint_url(&format!("user/{}", user_id)));

        let response = self.send(request, Some(token), "get_user").await?;
        Self::parse_enveloped(response, "get_user").await
    }
}
