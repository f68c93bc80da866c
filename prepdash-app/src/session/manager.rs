//! Session Token Manager
//!
//! Guarantees that outgoing authenticated calls carry a non-expired
//! access token, refreshing proactively and transparently.

use std::sync::Arc;

use tracing::{debug, info, warn};

use prepdash_api::PlatformApi;
use prepdash_core::{PrepdashError, Role};

use crate::auth::token::token_expiry_ms;
use crate::session::types::{Session, SessionError, TokenPair};
use crate::{AdminError, AdminResult};

/// Tokens are refreshed this long before their actual expiry, to absorb
/// clock skew and in-flight request latency.
pub const ACCESS_TOKEN_REFRESH_MARGIN_MS: i64 = 60 * 1000;

/// Owns the token lifecycle of admin sessions.
///
/// The manager itself is stateless; sessions are passed in and mutated
/// in place, so concurrent sessions and tests stay isolated.
pub struct SessionManager {
    api: Arc<dyn PlatformApi>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self { api }
    }

    /// Authenticate with credentials and construct a session.
    ///
    /// Fails with [`AdminError::InvalidCredentials`] when the platform
    /// rejects the login or the response carries no access token.
    /// Transport-level failures (connectivity, timeout) pass through as
    /// core errors so callers can distinguish them from a bad password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AdminResult<Session> {
        let payload = match self.api.login(email, password).await {
            Ok(payload) => payload,
            Err(e @ PrepdashError::Api { .. }) => {
                warn!(error = %e, "Login rejected by platform");
                return Err(AdminError::InvalidCredentials);
            }
            Err(e) => return Err(AdminError::Core(e)),
        };

        let Some(access_token) = payload.access_token.clone() else {
            warn!("Login response carried no access token");
            return Err(AdminError::InvalidCredentials);
        };

        let user_id = payload.user_id().unwrap_or_default().to_string();
        let role = payload
            .role
            .as_deref()
            .map(Role::normalize)
            .unwrap_or(Role::User);

        let session = Session {
            user_id,
            email: payload.user.as_ref().and_then(|u| u.email.clone()),
            role,
            access_token_expires_at: token_expiry_ms(&access_token),
            access_token,
            refresh_token: payload.refresh_token,
            error: None,
        };

        info!(user_id = %session.user_id, role = %session.role, "Authenticated");
        Ok(session)
    }

    /// Return an access token fit for the next authenticated call.
    ///
    /// Reuses the current token while it is more than the refresh margin
    /// away from expiry (no network call). Past the margin, a refresh is
    /// attempted when a refresh token is present and the session is not
    /// already flagged. When no refresh is possible the stale token is
    /// returned as-is; the backend's 401 is the caller's signal, there
    /// is no local rejection.
    pub async fn get_valid_access_token(&self, session: &mut Session) -> String {
        if !session.is_stale(ACCESS_TOKEN_REFRESH_MARGIN_MS) {
            return session.access_token.clone();
        }

        if session.error.is_none() && session.refresh_token.is_some() {
            self.refresh(session).await;
        } else {
            debug!(
                user_id = %session.user_id,
                errored = session.is_errored(),
                "Stale access token returned without refresh"
            );
        }

        session.access_token.clone()
    }

    /// Exchange the refresh token for a new token pair, in place.
    ///
    /// On success the access token (and the refresh token, only if the
    /// server rotated it) is replaced and the expiry recomputed. On any
    /// failure the session is left unmodified except for its error flag;
    /// deciding whether to force a re-login is the caller's concern.
    ///
    /// No lock is taken: two callers refreshing the same session
    /// concurrently each install their token pair, last write wins.
    pub async fn refresh(&self, session: &mut Session) {
        let Some(refresh_token) = session.refresh_token.clone() else {
            return;
        };

        debug!(user_id = %session.user_id, "Refreshing access token");

        let payload = match self.api.refresh_token(&refresh_token).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(user_id = %session.user_id, error = %e, "Token refresh failed");
                session.error = Some(SessionError::RefreshFailed);
                return;
            }
        };

        let Some(access_token) = payload.access_token else {
            warn!(
                user_id = %session.user_id,
                "Refresh response carried no access token"
            );
            session.error = Some(SessionError::RefreshFailed);
            return;
        };

        session.install_tokens(TokenPair {
            access_token,
            refresh_token: payload.refresh_token,
        });

        info!(user_id = %session.user_id, "Access token refreshed");
    }

    /// Destroy a session.
    ///
    /// Purely local: the platform keeps no session state for this client
    /// beyond the tokens themselves.
    pub fn sign_out(&self, session: Session) {
        info!(user_id = %session.user_id, "Signed out");
        drop(session);
    }
}
