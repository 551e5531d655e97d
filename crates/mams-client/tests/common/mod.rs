//! Common test utilities for mams-client integration tests

use std::sync::Arc;
use std::time::Duration;

use mams_client::{ApiClient, ClientConfig, MemoryCredentialStore};
use mams_types::CredentialPair;
use wiremock::MockServer;

/// Access token stored by [`authenticated_client`].
#[allow(dead_code)]
pub const TEST_ACCESS_TOKEN: &str = "header.payload.signature";

/// Client pointed at `server` with fast, jitter-free retries.
pub fn client_for(server: &MockServer, store: Arc<MemoryCredentialStore>) -> ApiClient {
    let config = ClientConfig::builder()
        .base_url(format!("{}/api", server.uri()))
        .request_timeout(Duration::from_secs(5))
        .retry_attempts(2)
        .retry_base_delay(Duration::from_millis(1))
        .retry_max_delay(Duration::from_millis(5))
        .build()
        .unwrap();
    ApiClient::new(config, store).unwrap()
}

/// Client with [`TEST_ACCESS_TOKEN`] already stored.
#[allow(dead_code)]
pub fn authenticated_client(server: &MockServer) -> (ApiClient, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::with_pair(CredentialPair::new(
        TEST_ACCESS_TOKEN,
        "refresh-token",
    )));
    (client_for(server, store.clone()), store)
}

/// Summary body as the service returns it.
#[allow(dead_code)]
pub fn summary_json(closing_balance: i64) -> serde_json::Value {
    serde_json::json!({
        "opening_balance": 100,
        "closing_balance": closing_balance,
        "net_movement": {
            "total": closing_balance - 100,
            "details": {"purchases": 10, "transfers_in": 5, "transfers_out": 2}
        },
        "assigned": 3,
        "expended": 1,
        "filters_applied": {"base_id": "1", "equipment_type_id": null,
                            "start_date": null, "end_date": null}
    })
}
