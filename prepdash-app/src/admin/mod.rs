//! Composite user administration
//!
//! A single desired-user-state request fans out into the backend calls
//! implied by the fields actually present. The decomposition is a
//! documented non-atomic hybrid: the role update is awaited first, the
//! remaining sub-operations run concurrently, and entitlement
//! provisioning runs strictly afterwards. There is no rollback.

pub mod service;
pub mod types;

pub use service::AdminService;
pub use types::{SubOperation, UserUpdateRequest};
