//! User-facing fetch failure signals

use mams_client::ClientError;
use thiserror::Error;

/// What the user is told when a fetch fails.
///
/// The underlying error is logged, not shown.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSignal {
    /// The service rejected the credential
    #[error("session expired, please re-authenticate")]
    SessionExpired,

    /// Anything else; the last good data stays on screen
    #[error("could not load data, please try again")]
    Retryable,
}

impl SyncSignal {
    /// Classify a failed fetch.
    pub fn from_error(error: &ClientError) -> Self {
        if error.is_unauthorized() {
            Self::SessionExpired
        } else {
            Self::Retryable
        }
    }

    /// Returns true if the user must log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unauthorized_is_session_expired() {
        let signal = SyncSignal::from_error(&ClientError::Unauthenticated("expired".into()));
        assert_eq!(signal, SyncSignal::SessionExpired);
        assert!(signal.requires_login());
        assert_eq!(signal.to_string(), "session expired, please re-authenticate");
    }

    #[test]
    fn test_other_failures_are_retryable() {
        for error in [
            ClientError::Unavailable("HTTP 503".into()),
            ClientError::Internal("boom".into()),
            ClientError::Timeout(Duration::from_secs(30)),
            ClientError::PermissionDenied("no".into()),
            ClientError::Serialization("bad body".into()),
        ] {
            assert_eq!(SyncSignal::from_error(&error), SyncSignal::Retryable);
        }
    }

    #[test]
    fn test_message_hides_detail() {
        let signal = SyncSignal::from_error(&ClientError::Internal("db password leaked".into()));
        assert!(!signal.to_string().contains("password"));
    }
}
