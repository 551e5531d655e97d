//! MAMS Auth Core - Session and authorization logic
//!
//! Client-side credential lifecycle (bootstrap, login, logout, refresh),
//! unverified token decoding, and route/role gating.

pub mod clock;
pub mod config;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod session;
pub mod token;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use guard::*;
pub use navigation::*;
pub use session::*;
pub use token::*;
