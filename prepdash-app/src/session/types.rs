//! Session types

use chrono::Utc;
use prepdash_core::Role;
use serde::{Deserialize, Serialize};

/// An access/refresh token pair as issued by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Why a session is flagged as errored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    /// The refresh token was rejected or the refresh call failed; the
    /// session is retained but no further automatic refresh is attempted
    RefreshFailed,
}

/// A signed-in admin session.
///
/// `access_token_expires_at` is always derived from decoding the access
/// token's expiry claim, never set independently of a real token. A
/// `None` expiry means the token could not be decoded and is treated as
/// already stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Access token expiry in epoch milliseconds, from the `exp` claim
    pub access_token_expires_at: Option<i64>,
    /// Set when a refresh attempt failed; cleared by a successful refresh
    pub error: Option<SessionError>,
}

impl Session {
    /// Whether the session has been flagged by a failed refresh
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    /// Install a freshly issued token pair, recomputing the expiry from
    /// the new access token and clearing any error flag.
    ///
    /// The stored refresh token is only replaced when the server rotated
    /// it. When the new access token's expiry cannot be decoded, the
    /// previous expiry is kept.
    pub fn install_tokens(&mut self, pair: TokenPair) {
        self.access_token_expires_at =
            crate::auth::token::token_expiry_ms(&pair.access_token).or(self.access_token_expires_at);
        self.access_token = pair.access_token;
        if let Some(rotated) = pair.refresh_token {
            self.refresh_token = Some(rotated);
        }
        self.error = None;
    }

    /// Whether the access token is within `margin_ms` of its expiry.
    ///
    /// An undecodable expiry counts as stale.
    pub fn is_stale(&self, margin_ms: i64) -> bool {
        match self.access_token_expires_at {
            Some(expires_at) => Utc::now().timestamp_millis() >= expires_at - margin_ms,
            None => true,
        }
    }
}
