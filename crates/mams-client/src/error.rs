//! Client errors
//!
//! Error types for MAMS client operations, with mapping from HTTP status codes
//! and transport failures.

use mams_types::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::StoreError;
use crate::interceptor::InvalidToken;

/// Client errors for MAMS operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection error - failed to reach the service.
    #[error("connection error: {message}")]
    Connection {
        /// Error message
        message: String,
        /// Whether the error is retryable
        retryable: bool,
    },

    /// Request timeout.
    #[error("request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Authentication required - token missing, expired, or rejected (401).
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// Permission denied - role not allowed (403).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request rejected by the service (400).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Form rejected locally, never sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Rate limited (429).
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),

    /// Service unavailable (408, 502, 503, 504).
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Any other non-success status.
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Stored access token cannot be sent as a header.
    #[error("{0}")]
    InvalidToken(#[from] InvalidToken),

    /// Credential store failure.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Response body did not match the expected shape.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection { retryable, .. } => *retryable,
            Self::Timeout(_) => true,
            Self::Unavailable(_) => true,
            Self::ResourceExhausted(_) => true, // Rate limits clear with backoff
            Self::Internal(_) => false,         // Might be permanent
            Self::Unauthenticated(_) => false,  // Need new credentials
            Self::PermissionDenied(_) => false,
            Self::NotFound(_) => false,
            Self::InvalidArgument(_) => false,
            Self::Validation(_) => false,
            Self::UnexpectedStatus { .. } => false,
            Self::InvalidToken(_) => false,
            Self::Store(_) => false,
            Self::Config(_) => false,
            Self::Serialization(_) => false,
        }
    }

    /// Returns true if the service rejected the credential (HTTP 401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// Returns the HTTP status this error originated from, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthenticated(_) => Some(401),
            Self::PermissionDenied(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::InvalidArgument(_) => Some(400),
            Self::ResourceExhausted(_) => Some(429),
            Self::Internal(_) => Some(500),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Unavailable(_)
            | Self::Connection { .. }
            | Self::Timeout(_)
            | Self::Validation(_)
            | Self::InvalidToken(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::Serialization(_) => None,
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>, retryable: bool) -> Self {
        Self::Connection {
            message: message.into(),
            retryable,
        }
    }

    /// Map a non-success HTTP status and its body into an error.
    ///
    /// The service reports failures as `{"error": "..."}` or, for
    /// authentication failures, `{"detail": "..."}`.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("HTTP {status}"));

        match status {
            400 | 422 => Self::InvalidArgument(message),
            401 => Self::Unauthenticated(message),
            403 => Self::PermissionDenied(message),
            404 => Self::NotFound(message),
            429 => Self::ResourceExhausted(message),
            500 => Self::Internal(message),
            408 | 502..=504 => Self::Unavailable(message),
            _ => Self::UnexpectedStatus { status, message },
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["error", "detail", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or_else(|| Some(value.to_string())),
        Err(_) => Some(body.chars().take(200).collect()),
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Serialization(err.to_string())
        } else if err.is_builder() {
            Self::connection(err.to_string(), false)
        } else {
            // Connect/read failures are typically transient
            Self::connection(err.to_string(), true)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Timeout(std::time::Duration::from_secs(1)).is_retryable());
        assert!(ClientError::Unavailable("server down".to_string()).is_retryable());
        assert!(ClientError::ResourceExhausted("rate limit".to_string()).is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!ClientError::NotFound("purchase".to_string()).is_retryable());
        assert!(!ClientError::InvalidArgument("bad input".to_string()).is_retryable());
        assert!(!ClientError::PermissionDenied("forbidden".to_string()).is_retryable());
        assert!(!ClientError::Unauthenticated("no token".to_string()).is_retryable());
        assert!(!ClientError::Validation(ValidationError::SameBase).is_retryable());
    }

    #[test]
    fn test_from_status_uses_error_field() {
        let err = ClientError::from_status(400, r#"{"error": "Insufficient assets at source base."}"#);
        match err {
            ClientError::InvalidArgument(msg) => {
                assert_eq!(msg, "Insufficient assets at source base.");
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_from_status_unauthorized_detail() {
        let err = ClientError::from_status(
            401,
            r#"{"detail": "Given token not valid for any token type", "code": "token_not_valid"}"#,
        );
        assert!(err.is_unauthorized());
        assert_eq!(err.http_status(), Some(401));
        assert!(err.to_string().contains("Given token not valid"));
    }

    #[test]
    fn test_from_status_empty_body() {
        let err = ClientError::from_status(503, "");
        assert!(matches!(err, ClientError::Unavailable(ref m) if m == "HTTP 503"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_status_request_timeout_is_retryable_unavailable() {
        let err = ClientError::from_status(408, "");
        assert!(matches!(err, ClientError::Unavailable(ref m) if m == "HTTP 408"));
        assert!(err.is_retryable());
        assert!(!err.to_string().contains("0s"));
    }

    #[test]
    fn test_from_status_unexpected() {
        let err = ClientError::from_status(418, "teapot");
        assert!(matches!(err, ClientError::UnexpectedStatus { status: 418, .. }));
    }

    #[test]
    fn test_connection_error() {
        let err = ClientError::connection("failed to connect", true);
        assert!(err.is_retryable());

        let err = ClientError::connection("invalid endpoint", false);
        assert!(!err.is_retryable());
    }
}
