//! HTTP transport
//!
//! [`ApiClient`] sends every request through the interceptor chain, maps
//! non-success statuses into [`ClientError`], and records request metrics.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::credentials::CredentialSource;
use crate::error::ClientError;
use crate::interceptor::{AuthInterceptor, CombinedInterceptor, Interceptor};
use crate::metrics::{self, Endpoint, RequestTimer};
use crate::retry::with_retry;

/// Client for the MAMS inventory service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    interceptor: CombinedInterceptor,
}

impl ApiClient {
    /// Create a client that authenticates with credentials read from `source`.
    pub fn new(
        config: ClientConfig,
        source: Arc<dyn CredentialSource>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::connection(e.to_string(), false))?;

        Ok(Self {
            http,
            config,
            interceptor: CombinedInterceptor::new(AuthInterceptor::new(source)),
        })
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request through the interceptor chain and map the status.
    async fn send(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let request = self.interceptor.intercept(request).await?;
        let timer = RequestTimer::start(endpoint);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                timer.timeout();
                return Err(ClientError::Timeout(self.config.request_timeout()));
            }
            Err(e) => {
                timer.error();
                return Err(e.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            timer.success();
            return Ok(response);
        }

        timer.error();
        let body = response.text().await.unwrap_or_default();
        debug!(endpoint = endpoint.as_str(), status = status.as_u16(), "request failed");
        Err(ClientError::from_status(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        let request = self
            .http
            .get(self.config.endpoint_url(endpoint.path()))
            .query(query);
        let response = self.send(endpoint, request).await?;
        Self::decode(response).await
    }

    /// GET an endpoint and decode its JSON body, retrying transient failures.
    #[instrument(skip_all, fields(endpoint = endpoint.as_str()), level = "debug")]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        with_retry(self.config.retry(), |attempt| {
            if attempt > 0 {
                metrics::record_retry(endpoint, attempt);
            }
            self.get_once(endpoint, query)
        })
        .await
    }

    /// POST a JSON body and decode the JSON response. Never retried.
    #[instrument(skip_all, fields(endpoint = endpoint.as_str()), level = "debug")]
    pub async fn post_json<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.config.endpoint_url(endpoint.path()))
            .json(body);
        let response = self.send(endpoint, request).await?;
        Self::decode(response).await
    }
}
