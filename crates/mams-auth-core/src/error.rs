//! Auth errors

use mams_client::{ClientError, StoreError};
use thiserror::Error;

/// Session errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username/password rejected by the token endpoint
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No stored credentials to work with
    #[error("not authenticated")]
    NotAuthenticated,

    /// Access token could not be decoded
    #[error("invalid token")]
    InvalidToken,

    /// Access token has expired
    #[error("token expired")]
    TokenExpired,

    /// Refresh token rejected by the service
    #[error("refresh token rejected, please login again")]
    RefreshRejected,

    /// Profile role is not one this client understands
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A logout or newer login happened while this operation was in flight
    #[error("session changed while the operation was in progress")]
    Superseded,

    /// Credential store failure
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    /// Service request failure
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl AuthError {
    /// Get error code for display and logging
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::RefreshRejected => "REFRESH_REJECTED",
            Self::UnknownRole(_) => "UNKNOWN_ROLE",
            Self::Superseded => "SUPERSEDED",
            Self::Store(_) => "STORE_ERROR",
            Self::Client(e) if e.is_unauthorized() => "UNAUTHORIZED",
            Self::Client(_) => "SERVICE_ERROR",
        }
    }

    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_retryable())
    }
}
