//! Core domain type definitions

use serde::{Deserialize, Serialize};

/// Platform role attached to a user account
///
/// Role strings arriving from forms or stored records are normalized
/// (lower-cased, underscores mapped to hyphens) before matching.
/// Unrecognized values are carried through normalized-as-is rather than
/// rejected; the backend is the authority on what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    SubAdmin,
    Admin,
    Other(String),
}

impl Role {
    /// Normalize a raw role string against the fixed platform roles
    pub fn normalize(raw: &str) -> Self {
        let normalized = raw.to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "user" => Role::User,
            "sub-admin" | "subadmin" => Role::SubAdmin,
            "admin" => Role::Admin,
            _ => Role::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::SubAdmin => "sub-admin",
            Role::Admin => "admin",
            Role::Other(s) => s,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::normalize(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Account status on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl From<bool> for AccountStatus {
    fn from(is_active: bool) -> Self {
        if is_active {
            AccountStatus::Active
        } else {
            AccountStatus::Inactive
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription tier for user accounts
///
/// Like [`Role`], unknown tiers are passed through lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionTier {
    Starter,
    Professional,
    Other(String),
}

impl SubscriptionTier {
    pub fn normalize(raw: &str) -> Self {
        let normalized = raw.to_lowercase();
        match normalized.as_str() {
            "starter" => SubscriptionTier::Starter,
            "professional" => SubscriptionTier::Professional,
            _ => SubscriptionTier::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionTier::Starter => "starter",
            SubscriptionTier::Professional => "professional",
            SubscriptionTier::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for SubscriptionTier {
    fn from(raw: String) -> Self {
        SubscriptionTier::normalize(&raw)
    }
}

impl From<SubscriptionTier> for String {
    fn from(tier: SubscriptionTier) -> Self {
        tier.as_str().to_string()
    }
}
