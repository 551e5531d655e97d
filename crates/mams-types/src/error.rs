//! Common error types

use thiserror::Error;

/// A form rejected before it is sent to the inventory service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required selection or field is empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Quantity must be at least one unit
    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    /// Transfer source and destination are the same base
    #[error("source and destination bases cannot be the same")]
    SameBase,
}
