//! Client configuration

use std::time::Duration;

use crate::retry::RetryConfig;

/// Default API base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    retry: RetryConfig,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder().base_url(base_url).build()
    }

    /// Start building a configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// - `MAMS_API_URL` (default `http://localhost:8000/api`)
    /// - `MAMS_CONNECT_TIMEOUT_SECS` (default 5)
    /// - `MAMS_REQUEST_TIMEOUT_SECS` (default 30)
    /// - `MAMS_RETRY_ATTEMPTS` (default 2)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder_from_env()?.build()
    }

    /// Builder seeded from the environment, for callers that override
    /// individual settings (e.g. a command-line flag) before building.
    pub fn builder_from_env() -> Result<ClientConfigBuilder, ConfigError> {
        let base_url =
            std::env::var("MAMS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let connect_timeout_secs: u64 = std::env::var("MAMS_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("MAMS_CONNECT_TIMEOUT_SECS"))?;

        let request_timeout_secs: u64 = std::env::var("MAMS_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("MAMS_REQUEST_TIMEOUT_SECS"))?;

        let retry_attempts: u32 = std::env::var("MAMS_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("MAMS_RETRY_ATTEMPTS"))?;

        Ok(Self::builder()
            .base_url(base_url)
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .request_timeout(Duration::from_secs(request_timeout_secs))
            .retry_attempts(retry_attempts))
    }

    /// API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL of an endpoint path (which starts with `/`).
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// TCP connect timeout
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Whole-request timeout
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Retry behaviour for idempotent reads
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    retry: RetryConfig,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default().with_max_attempts(2),
        }
    }
}

impl ClientConfigBuilder {
    /// Set the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the number of retries for idempotent reads (0 disables).
    #[must_use]
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry = self.retry.with_max_attempts(attempts);
        self
    }

    /// Set the base backoff delay.
    #[must_use]
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry = self.retry.with_base_delay(delay);
        self
    }

    /// Set the maximum backoff delay.
    #[must_use]
    pub fn retry_max_delay(mut self, delay: Duration) -> Self {
        self.retry = self.retry.with_max_delay(delay);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.base_url));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("request_timeout"));
        }

        Ok(ClientConfig {
            base_url,
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
            retry: self.retry,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for configuration setting: {0}")]
    Invalid(&'static str),

    #[error("Invalid API endpoint (expected http:// or https:// URL): {0}")]
    InvalidEndpoint(String),
}
