//! Session configuration

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Session manager configuration
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Remove malformed or expired credentials found at bootstrap.
    /// Off by default: stale credentials are left for the next login to replace.
    pub clear_stale_credentials: bool,
    /// Treat tokens expiring within this window as already expired.
    pub expiry_leeway: Duration,
}

impl SessionConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether stale credentials are cleared at bootstrap
    #[must_use]
    pub fn with_clear_stale_credentials(mut self, clear: bool) -> Self {
        self.clear_stale_credentials = clear;
        self
    }

    /// Set the expiry leeway
    #[must_use]
    pub fn with_expiry_leeway(mut self, leeway: Duration) -> Self {
        self.expiry_leeway = leeway;
        self
    }

    /// Whether a token expiring at `expires_at` counts as expired at `now`.
    pub fn is_expired(&self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        chrono::Duration::from_std(self.expiry_leeway)
            .ok()
            .and_then(|leeway| now.checked_add_signed(leeway))
            .map_or(true, |deadline| expires_at <= deadline)
    }
}
