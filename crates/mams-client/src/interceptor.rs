//! Request interceptors
//!
//! Interceptors decorate every outgoing request with headers. The auth
//! interceptor reads the access token from the credential source at send
//! time, so a login or logout takes effect on the very next request.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

use crate::credentials::CredentialSource;
use crate::error::ClientError;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Decorates outgoing requests.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Add headers (or otherwise adjust) the request before it is sent.
    async fn intercept(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError>;
}

/// Error indicating an invalid token format.
#[derive(Debug, Clone, Copy)]
pub struct InvalidToken;

impl std::fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid token format")
    }
}

impl std::error::Error for InvalidToken {}

/// Build an `Authorization: Bearer` header value.
pub fn bearer_header(token: &str) -> Result<HeaderValue, InvalidToken> {
    let mut value: HeaderValue = format!("Bearer {token}").parse().map_err(|_| InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Interceptor that adds the stored bearer token to requests.
///
/// Requests go out without an `Authorization` header when nothing is stored.
#[derive(Clone)]
pub struct AuthInterceptor {
    source: Arc<dyn CredentialSource>,
}

impl AuthInterceptor {
    /// Create an interceptor reading from `source`.
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self { source }
    }

    /// Current header value, if a token is stored.
    pub async fn header(&self) -> Result<Option<HeaderValue>, ClientError> {
        match self.source.access_token().await? {
            Some(token) if !token.is_empty() => Ok(Some(bearer_header(&token)?)),
            _ => Ok(None),
        }
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("source", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl Interceptor for AuthInterceptor {
    async fn intercept(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        Ok(match self.header().await? {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        })
    }
}

/// Interceptor that adds a request ID for tracing.
#[derive(Debug, Clone, Default)]
pub struct RequestIdInterceptor;

impl RequestIdInterceptor {
    /// Create a new request ID interceptor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Interceptor for RequestIdInterceptor {
    async fn intercept(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        Ok(request.header(REQUEST_ID_HEADER, request_id))
    }
}

/// Combined interceptor that applies auth then request id.
#[derive(Debug, Clone)]
pub struct CombinedInterceptor {
    auth: AuthInterceptor,
    request_id: RequestIdInterceptor,
}

impl CombinedInterceptor {
    /// Create a combined interceptor with all features.
    pub fn new(auth: AuthInterceptor) -> Self {
        Self {
            auth,
            request_id: RequestIdInterceptor::new(),
        }
    }

    /// Access the auth interceptor.
    pub fn auth(&self) -> &AuthInterceptor {
        &self.auth
    }
}

#[async_trait]
impl Interceptor for CombinedInterceptor {
    async fn intercept(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let request = self.auth.intercept(request).await?;
        self.request_id.intercept(request).await
    }
}
