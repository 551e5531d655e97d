//! Backoff for idempotent reads
//!
//! Only GETs go through [`with_retry`]. Whether a failure is worth another
//! attempt is decided by [`ClientError::is_retryable`]: connection drops,
//! timeouts, 429 and 502-504 are; everything the service answered
//! deliberately is not.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::warn;

use crate::error::ClientError;

/// How many times a read is repeated and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Attempts after the first request
    pub max_attempts: u32,
    /// Wait before the first retry; doubled for each one after
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Wait before retry number `retry` (0-based), without jitter.
    fn backoff(&self, retry: u32) -> Duration {
        self.base_delay
            .checked_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Backoff plus up to a quarter of it at random.
    fn delay(&self, retry: u32) -> Duration {
        let backoff = self.backoff(retry);
        let spread = backoff.as_millis() as u64 / 4;
        if spread == 0 {
            return backoff;
        }
        backoff + Duration::from_millis(rand::thread_rng().gen_range(0..=spread))
    }
}

/// Run `request` until it succeeds, fails for good, or retries run out.
///
/// `request` is handed the attempt number, starting at 0.
pub(crate) async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut request: F,
) -> Result<T, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0;
    loop {
        let err = match request(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if attempt >= config.max_attempts || !err.is_retryable() {
            return Err(err);
        }

        let delay = config.delay(attempt);
        warn!(
            error = %err,
            retry = attempt + 1,
            of = config.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "read failed, retrying"
        );
        sleep(delay).await;
        attempt += 1;
    }
}
