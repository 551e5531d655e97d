//! Session manager against a mock HTTP service
//!
//! Exercises the session manager with the real client: stored credentials are
//! read per request, and the identity comes from `/users/me/`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use mams_auth_core::{AuthError, Route, RouterState, SessionManager, SessionState};
use mams_client::{ApiClient, ClientConfig, CredentialSource, MemoryCredentialStore};
use mams_types::{BaseId, CredentialPair, Role};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::access_token;

type Manager = SessionManager<MemoryCredentialStore, ApiClient>;

fn manager_for(
    server: &MockServer,
    store: Arc<MemoryCredentialStore>,
) -> (Manager, Arc<RouterState>) {
    let config = ClientConfig::builder()
        .base_url(format!("{}/api", server.uri()))
        .request_timeout(Duration::from_secs(5))
        .retry_attempts(0)
        .build()
        .unwrap();
    let api = Arc::new(ApiClient::new(config, store.clone()).unwrap());
    let router = Arc::new(RouterState::new(Route::Entry));
    (SessionManager::new(store, api, router.clone()), router)
}

#[tokio::test]
async fn test_bootstrap_restores_base_commander() {
    let server = MockServer::start().await;
    let token = access_token("cmd1", "BASE_COMMANDER", Some("B7"));

    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 4,
            "username": "cmd1",
            "role": "Base Commander",
            "base": {"id": "B7", "name": "Fort Alpha", "location": "North"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair(CredentialPair::new(
        token,
        "refresh-token",
    )));
    let (manager, _router) = manager_for(&server, store);

    let state = manager.bootstrap().await;
    let identity = state.identity().expect("should be authenticated");
    assert_eq!(identity.subject(), "cmd1");
    assert_eq!(identity.role(), Role::BaseCommander);
    assert_eq!(identity.base_scope(), Some(&BaseId::new("B7")));
}

#[tokio::test]
async fn test_bootstrap_profile_rejected_is_anonymous() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"detail": "Token is invalid or expired"})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair(CredentialPair::new(
        access_token("cmd1", "BASE_COMMANDER", Some("B7")),
        "refresh-token",
    )));
    let (manager, _router) = manager_for(&server, store);

    assert_eq!(manager.bootstrap().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_wrong_password_leaves_everything_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(serde_json::json!({"username": "admin", "password": "nope"})))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "No active account found with the given credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let (manager, router) = manager_for(&server, store.clone());
    manager.bootstrap().await;

    let result = manager.login("admin", "nope").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert_eq!(manager.state(), SessionState::Anonymous);
    assert!(store.load().await.unwrap().is_none());
    assert_eq!(router.current(), Route::Entry);
}

#[tokio::test]
async fn test_login_then_logout() {
    let server = MockServer::start().await;
    let token = access_token("logi", "LOGISTICS_OFFICER", None);

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": token,
            "refresh": "fresh-refresh"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "logi",
            "role": "LOGISTICS_OFFICER",
            "base": null
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let (manager, router) = manager_for(&server, store.clone());

    let identity = manager.login("logi", "secret").await.unwrap();
    assert_eq!(identity.role(), Role::LogisticsOfficer);
    assert!(identity.base_scope().is_none());
    assert_eq!(
        store.load().await.unwrap().unwrap().refresh_token,
        "fresh-refresh"
    );

    manager.logout().await.unwrap();
    assert_eq!(manager.state(), SessionState::Anonymous);
    assert!(store.load().await.unwrap().is_none());
    assert_eq!(router.current(), Route::Entry);
}
