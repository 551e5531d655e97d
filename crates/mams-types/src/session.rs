//! Credential types

use serde::{Deserialize, Serialize};

/// Persistence key of the access credential.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Persistence key of the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Access and refresh credentials, persisted as opaque strings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived bearer credential
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Longer-lived credential used to mint new access tokens
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

impl CredentialPair {
    /// Create a new credential pair
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
