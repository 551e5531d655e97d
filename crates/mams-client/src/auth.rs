//! Authentication endpoints
//!
//! Credential exchange, refresh, and the canonical identity profile.

use async_trait::async_trait;
use mams_types::{BaseId, CredentialPair, Reference, Role, RoleParseError};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::metrics::Endpoint;

/// Canonical profile from `/users/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Username
    pub username: String,
    /// Role code (`BASE_COMMANDER`) or display name (`Base Commander`)
    pub role: String,
    /// Assigned base: nested object, bare id, or null
    #[serde(default)]
    pub base: Option<Reference<BaseId>>,
}

impl Profile {
    /// Parse the role string.
    pub fn parsed_role(&self) -> Result<Role, RoleParseError> {
        self.role.parse()
    }

    /// Assigned base id, if any.
    pub fn base_id(&self) -> Option<BaseId> {
        self.base
            .as_ref()
            .map(|b| b.id().clone())
            .filter(|id| !id.is_empty())
    }
}

/// Response of the refresh-token exchange.
///
/// `refresh` is present only when the service rotates refresh tokens.
#[derive(Clone, Deserialize)]
pub struct TokenRefresh {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl std::fmt::Debug for TokenRefresh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresh")
            .field("access", &"[REDACTED]")
            .field("refresh", &self.refresh.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Authentication operations against the service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange username and password for an access/refresh pair.
    async fn obtain_token(&self, username: &str, password: &str)
        -> Result<CredentialPair, ClientError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh_token(&self, refresh: &str) -> Result<TokenRefresh, ClientError>;

    /// Fetch the profile of the user the stored access token belongs to.
    async fn current_user(&self) -> Result<Profile, ClientError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    #[instrument(skip(self, password), level = "debug")]
    async fn obtain_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialPair, ClientError> {
        let response: TokenRefresh = self
            .post_json(Endpoint::ObtainToken, &LoginRequest { username, password })
            .await?;

        let refresh = response
            .refresh
            .ok_or_else(|| ClientError::Serialization("token response missing refresh".into()))?;
        Ok(CredentialPair::new(response.access, refresh))
    }

    #[instrument(skip_all, level = "debug")]
    async fn refresh_token(&self, refresh: &str) -> Result<TokenRefresh, ClientError> {
        self.post_json(Endpoint::RefreshToken, &RefreshRequest { refresh })
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn current_user(&self) -> Result<Profile, ClientError> {
        self.get_json(Endpoint::CurrentUser, &[]).await
    }
}
