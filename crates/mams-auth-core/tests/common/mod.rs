//! Common test utilities for mams-auth-core integration tests

pub mod mock_api;
pub mod tokens;

#[allow(unused_imports)]
pub use mock_api::{HydrationGate, MockAuthApi, Reply};
#[allow(unused_imports)]
pub use tokens::{access_token, expired_access_token, ManualClock, TestClaims};
