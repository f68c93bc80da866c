//! Authentication helpers
//!
//! Token payload inspection lives here; the session state machine that
//! uses it is in [`crate::session`].

pub mod token;

pub use token::{decode_jwt_payload, token_expiry_ms};
