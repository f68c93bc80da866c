//! Configuration management

use crate::error::{ErrorContext, PrepdashError, PrepdashResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default platform endpoint used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Flat per-request network timeout applied to every outbound call
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepdashConfig {
    pub api: ApiSettings,
    pub logging: LoggingConfig,
}

/// Settings for the platform REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the platform backend
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: "prepdash/0.1".to_string(),
        }
    }
}

impl ApiSettings {
    /// Read settings from the environment, falling back to defaults.
    ///
    /// `PREPDASH_BASE_URL` may carry a trailing `/api/v1` suffix; it is
    /// stripped so endpoint paths can be appended uniformly.
    pub fn from_env() -> Self {
        let base_url = std::env::var("PREPDASH_BASE_URL")
            .map(|raw| normalize_base_url(&raw))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            base_url,
            ..Default::default()
        }
    }
}

/// Normalize an operator-supplied base URL: trim trailing slashes and a
/// trailing `/api/v1` segment if present.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    trimmed
        .strip_suffix("/api/v1")
        .unwrap_or(trimmed)
        .to_string()
}

impl Default for PrepdashConfig {
    fn default() -> Self {
        Self {
            api: ApiSettings::from_env(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PrepdashConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> PrepdashResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PrepdashError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let mut config: PrepdashConfig =
            toml::from_str(&content).map_err(|e| PrepdashError::Config {
                message: format!("Failed to parse config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("parse_toml")
                    .with_suggestion("Check TOML syntax in config file"),
            })?;

        config.api.base_url = normalize_base_url(&config.api.base_url);
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PrepdashResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| PrepdashError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| PrepdashError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> PrepdashResult<()> {
        if url::Url::parse(&self.api.base_url).is_err() {
            return Err(PrepdashError::Config {
                message: format!("Invalid base URL: {}", self.api.base_url),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.base_url to a full http(s) URL"),
            });
        }

        if self.api.timeout_seconds == 0 {
            return Err(PrepdashError::Config {
                message: "Request timeout must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.timeout_seconds to a positive value"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(
            normalize_base_url("https://api.example.com/"),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/api/v1"),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/api/v1/"),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_base_url("http://localhost:5000"),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_default_config_validates() {
        let config = PrepdashConfig {
            api: ApiSettings::default(),
            logging: LoggingConfig::default(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = PrepdashConfig {
            api: ApiSettings::default(),
            logging: LoggingConfig::default(),
        };
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = PrepdashConfig {
            api: ApiSettings {
                base_url: "https://platform.example.com".to_string(),
                timeout_seconds: 30,
                user_agent: "prepdash-test".to_string(),
            },
            logging: LoggingConfig::default(),
        };

        config.save_to_file(&path).unwrap();
        let loaded = PrepdashConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://platform.example.com");
        assert_eq!(loaded.api.timeout_seconds, 30);
    }
}
