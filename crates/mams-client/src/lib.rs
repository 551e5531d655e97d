//! MAMS Client - SDK for the inventory service
//!
//! HTTP client for the MAMS inventory service: credential exchange, identity
//! profile, reference data, dashboard summaries, and inventory records.
//! Every request carries the bearer credential read from a [`CredentialSource`]
//! at send time.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod inventory;
pub mod metrics;
mod retry;

pub use auth::{AuthApi, Profile, TokenRefresh};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use credentials::{
    CredentialSource, CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError,
};
pub use error::ClientError;
pub use http::ApiClient;
pub use interceptor::{AuthInterceptor, CombinedInterceptor, Interceptor, RequestIdInterceptor};
pub use inventory::InventoryApi;
pub use retry::RetryConfig;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
