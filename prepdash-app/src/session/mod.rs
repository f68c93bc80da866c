//! Session state and lifecycle
//!
//! A [`Session`] is an explicitly owned value, not ambient global state:
//! callers hold it, pass it to the [`SessionManager`] for token upkeep,
//! and decide where (if anywhere) it is persisted.

pub mod manager;
pub mod types;

pub use manager::{SessionManager, ACCESS_TOKEN_REFRESH_MARGIN_MS};
pub use types::{Session, SessionError, TokenPair};
