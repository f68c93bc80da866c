//! Prepdash App - session lifecycle and composite admin operations
//!
//! This crate holds the two stateful pieces of the admin client:
//!
//! - [`session::SessionManager`]: owns the access/refresh token pair of
//!   a signed-in session and decides when to reuse, refresh or flag it.
//! - [`admin::AdminService`]: decomposes a single desired-user-state
//!   request into the ordered and concurrent backend calls it implies,
//!   and provisions exam entitlements.
//!
//! ## Architecture
//!
//! The layering mirrors the rest of the workspace:
//! - **Wire boundary** (prepdash-api): one method per endpoint, no policy
//! - **Application** (this crate): token lifecycle and orchestration
//! - **Presentation** (prepdash-cli): user interface

pub mod admin;
pub mod auth;
pub mod session;

pub use admin::{AdminService, SubOperation, UserUpdateRequest};
pub use auth::token::{decode_jwt_payload, token_expiry_ms};
pub use session::{Session, SessionError, SessionManager, TokenPair, ACCESS_TOKEN_REFRESH_MARGIN_MS};

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Login rejected by the platform or the response carried no token
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// One step of a composite update failed; earlier steps may have
    /// already been applied server-side
    #[error("{operation} update failed: {source}")]
    SubOperation {
        operation: SubOperation,
        #[source]
        source: prepdash_core::PrepdashError,
    },

    #[error("Core error: {0}")]
    Core(#[from] prepdash_core::PrepdashError),
}

pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
    /// Which composite sub-operation failed, if this is such an error
    pub fn failed_operation(&self) -> Option<SubOperation> {
        match self {
            AdminError::SubOperation { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::{
        AdminError, AdminResult, AdminService, Session, SessionError, SessionManager,
        UserUpdateRequest,
    };
}
