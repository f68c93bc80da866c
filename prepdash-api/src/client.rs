//! HTTP client configuration and construction

use prepdash_core::{ApiSettings, ErrorContext, PrepdashError, PrepdashResult};
use std::collections::HashMap;

/// Configuration for the platform API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API (without the `/api/v1` prefix)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Additional headers
    pub headers: HashMap<String, String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: prepdash_core::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: prepdash_core::DEFAULT_TIMEOUT_SECONDS,
            user_agent: "prepdash/0.1".to_string(),
            headers: HashMap::new(),
        }
    }
}

impl ApiClientConfig {
    /// Create a configuration for the given platform base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: prepdash_core::normalize_base_url(&base_url.into()),
            ..Default::default()
        }
    }

    /// Create a configuration from loaded settings
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            base_url: prepdash_core::normalize_base_url(&settings.base_url),
            timeout_seconds: settings.timeout_seconds,
            user_agent: settings.user_agent.clone(),
            headers: HashMap::new(),
        }
    }

    /// Set additional header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Helper function to create HTTP client with common configuration
pub fn create_http_client(config: &ApiClientConfig) -> PrepdashResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            PrepdashError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    headers.insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    for (key, value) in &config.headers {
        let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            PrepdashError::Config {
                message: format!("Invalid header name '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?;

        let header_value =
            reqwest::header::HeaderValue::from_str(value).map_err(|e| PrepdashError::Config {
                message: format!("Invalid header value for '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            })?;

        headers.insert(header_name, header_value);
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| PrepdashError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })?;

    Ok(client)
}

/// Helper function to turn a non-2xx response into a structured error
///
/// The platform wraps error details as `{ "message": "..." }`; that
/// message is surfaced when present, otherwise the raw body or the
/// canonical status reason.
pub async fn handle_response_error(response: reqwest::Response, operation: &str) -> PrepdashError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();
    let server_message = serde_json::from_str::<serde_json::Value>(&error_body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));

    let detail = server_message.unwrap_or_else(|| {
        if error_body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            error_body
        }
    });

    PrepdashError::Api {
        message: format!("HTTP {} error for {}: {}", status.as_u16(), url, detail),
        status: Some(status.as_u16()),
        source: None,
        context: ErrorContext::new("platform_api")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                401 => "Re-authenticate or refresh the session",
                403 => "Check the account's role and permissions",
                404 => "Check the user or exam identifier",
                _ => "Check network connectivity and API status",
            }),
    }
}
