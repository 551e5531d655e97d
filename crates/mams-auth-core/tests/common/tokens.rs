//! Test token minting
//!
//! Tokens are signed with a throwaway HMAC secret so they look exactly like
//! what the service issues. The client never checks the signature.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use mams_auth_core::Clock;
use serde::Serialize;

const TEST_SIGNING_SECRET: &[u8] = b"test-signing-secret-not-for-production";

/// Claims in the shape the service issues
#[derive(Debug, Clone, Serialize)]
pub struct TestClaims {
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub base_id: Option<String>,
}

impl TestClaims {
    /// Claims valid for one hour
    pub fn valid(username: &str, role: &str, base_id: Option<&str>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            token_type: "access".to_string(),
            exp: now + 3600,
            iat: now,
            jti: format!("jti-{username}-{now}"),
            user_id: 4,
            username: username.to_string(),
            role: role.to_string(),
            base_id: base_id.map(str::to_string),
        }
    }

    #[allow(dead_code)]
    pub fn expiring_at(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    pub fn sign(&self) -> String {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(TEST_SIGNING_SECRET),
        )
        .expect("failed to sign test token")
    }
}

/// Signed access token valid for one hour
#[allow(dead_code)]
pub fn access_token(username: &str, role: &str, base_id: Option<&str>) -> String {
    TestClaims::valid(username, role, base_id).sign()
}

/// Signed access token that expired an hour ago
#[allow(dead_code)]
pub fn expired_access_token(username: &str, role: &str) -> String {
    let exp = Utc::now().timestamp() - 3600;
    TestClaims::valid(username, role, None).expiring_at(exp).sign()
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
