//! Types for composite user updates

use serde::{Deserialize, Serialize};

/// A partial desired-state request for one user.
///
/// Each present field independently triggers one backend sub-operation;
/// fields are not transactional with respect to each other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdateRequest {
    /// New platform role; normalized before submission
    pub role: Option<String>,
    /// New subscription tier; lower-cased before submission
    pub subscription_tier: Option<String>,
    /// Sub-admin permission grants. Only applied when the resolved role
    /// is sub-admin; silently dropped otherwise.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Account activation; `true` maps to "active", `false` to "inactive"
    pub is_active: Option<bool>,
    /// One-time password to set on the account
    pub temp_password: Option<String>,
}

impl UserUpdateRequest {
    /// Whether the request carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.subscription_tier.is_none()
            && self.permissions.is_empty()
            && self.is_active.is_none()
            && self.temp_password.is_none()
    }
}

/// The backend sub-operations a composite update decomposes into.
///
/// Carried inside composite failures so callers know which step
/// rejected; earlier steps may already have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubOperation {
    Role,
    Subscription,
    Permissions,
    Status,
    Password,
    ExamUnlock,
}

impl std::fmt::Display for SubOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SubOperation::Role => "role",
            SubOperation::Subscription => "subscription",
            SubOperation::Permissions => "permissions",
            SubOperation::Status => "status",
            SubOperation::Password => "password",
            SubOperation::ExamUnlock => "exam unlock",
        };
        write!(f, "{}", name)
    }
}
