//! Identity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BaseId, Role};

/// The authenticated user as the rest of the client sees it.
///
/// Built once per hydration from the canonical profile (role, base) and the
/// access token's expiry. Replaced wholesale on re-login, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    subject: String,
    role: Role,
    base_scope: Option<BaseId>,
    expires_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity
    pub fn new(
        subject: impl Into<String>,
        role: Role,
        base_scope: Option<BaseId>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject: subject.into(),
            role,
            base_scope: base_scope.filter(|b| !b.is_empty()),
            expires_at,
        }
    }

    /// Username
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Capability role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Base the user is restricted to; `None` means unrestricted.
    pub fn base_scope(&self) -> Option<&BaseId> {
        self.base_scope.as_ref()
    }

    /// Access token expiry
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check whether the access token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check whether the role is one of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}
