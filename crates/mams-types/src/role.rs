//! Role types

use serde::{Deserialize, Serialize};

/// Capability role of a MAMS user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access across every base
    Admin,
    /// Restricted to a single base
    BaseCommander,
    /// Records purchases and transfers across bases
    LogisticsOfficer,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Self::Admin, Self::BaseCommander, Self::LogisticsOfficer];

    /// Wire code used in tokens and query payloads.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::BaseCommander => "BASE_COMMANDER",
            Self::LogisticsOfficer => "LOGISTICS_OFFICER",
        }
    }

    /// Human-readable name, as returned by the profile endpoint.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::BaseCommander => "Base Commander",
            Self::LogisticsOfficer => "Logistics Officer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    /// Accepts both the wire code (`BASE_COMMANDER`) and the display name
    /// (`Base Commander`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "ADMIN" => Ok(Self::Admin),
            "BASE_COMMANDER" => Ok(Self::BaseCommander),
            "LOGISTICS_OFFICER" => Ok(Self::LogisticsOfficer),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// Error parsing a role string
#[derive(Debug, Clone)]
pub struct RoleParseError(pub String);

impl std::fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for RoleParseError {}
