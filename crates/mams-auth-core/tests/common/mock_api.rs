//! Scripted `AuthApi` for session tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mams_client::{AuthApi, ClientError, Profile, TokenRefresh};
use mams_types::{BaseId, CredentialPair, Reference};
use tokio::sync::Notify;

/// Scripted outcome of a call
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Unauthorized,
    Unavailable,
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, ClientError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Unauthorized => Err(ClientError::Unauthenticated(
                "No active account found with the given credentials".to_string(),
            )),
            Self::Unavailable => Err(ClientError::Unavailable("HTTP 503".to_string())),
        }
    }
}

/// Holds profile fetches until released
#[derive(Debug, Default)]
pub struct HydrationGate {
    pub started: Notify,
    pub release: Notify,
}

pub struct MockAuthApi {
    token: Mutex<Reply<CredentialPair>>,
    refresh: Mutex<Reply<TokenRefresh>>,
    profile: Mutex<Reply<Profile>>,
    gate: Option<Arc<HydrationGate>>,
    pub token_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockAuthApi {
    /// Profile for `username`; every other call fails with 503.
    pub fn with_profile(username: &str, role: &str, base: Option<&str>) -> Self {
        Self {
            token: Mutex::new(Reply::Unavailable),
            refresh: Mutex::new(Reply::Unavailable),
            profile: Mutex::new(Reply::Ok(profile(username, role, base))),
            gate: None,
            token_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn token_reply(self, reply: Reply<CredentialPair>) -> Self {
        *self.token.lock().unwrap() = reply;
        self
    }

    pub fn refresh_reply(self, reply: Reply<TokenRefresh>) -> Self {
        *self.refresh.lock().unwrap() = reply;
        self
    }

    pub fn profile_reply(self, reply: Reply<Profile>) -> Self {
        *self.profile.lock().unwrap() = reply;
        self
    }

    /// Change the profile reply after construction
    pub fn set_profile_reply(&self, reply: Reply<Profile>) {
        *self.profile.lock().unwrap() = reply;
    }

    pub fn gated(mut self, gate: Arc<HydrationGate>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// Profile as `/users/me/` returns it
#[allow(dead_code)]
pub fn profile(username: &str, role: &str, base: Option<&str>) -> Profile {
    Profile {
        username: username.to_string(),
        role: role.to_string(),
        base: base.map(|id| Reference::Id(BaseId::new(id))),
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn obtain_token(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<CredentialPair, ClientError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.token.lock().unwrap().clone();
        reply.produce()
    }

    async fn refresh_token(&self, _refresh: &str) -> Result<TokenRefresh, ClientError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.refresh.lock().unwrap().clone();
        reply.produce()
    }

    async fn current_user(&self) -> Result<Profile, ClientError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        let reply = self.profile.lock().unwrap().clone();
        reply.produce()
    }
}
