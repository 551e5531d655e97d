//! Common test utilities for mams-dashboard integration tests

pub mod mock_inventory;

#[allow(unused_imports)]
pub use mock_inventory::{base, purchase, summary, PendingSummary, ScriptedInventory};
