//! MAMS Dashboard - view state for the inventory dashboard
//!
//! - [`DataSyncController`]: filter-driven summary fetches where only the
//!   response to the latest filter is ever displayed
//! - [`ReferenceCache`]: bases and equipment types, fetched once and kept
//!   until invalidated
//! - [`RecordLoader`]: record lists and validated create forms

pub mod metrics;
pub mod records;
pub mod reference;
pub mod signal;
pub mod sync;

pub use records::{Assignments, Expenditures, Purchases, RecordKind, RecordLoader, Transfers};
pub use reference::ReferenceCache;
pub use signal::SyncSignal;
pub use sync::{DashboardView, DataSyncController, FetchOutcome};
