//! MAMS Types - Shared domain types
//!
//! This crate contains domain types used across the MAMS client crates:
//! - Roles and the authenticated identity
//! - Credential pairs and dashboard filters
//! - Inventory reference data, summaries, and record types
//! - New-record forms and their validation

pub mod error;
pub mod filter;
pub mod forms;
pub mod ids;
pub mod inventory;
pub mod role;
pub mod session;
pub mod user;

pub use error::*;
pub use filter::*;
pub use forms::*;
pub use ids::*;
pub use inventory::*;
pub use role::*;
pub use session::*;
pub use user::*;
