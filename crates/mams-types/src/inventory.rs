//! Inventory reference data, dashboard summary, and record types
//!
//! These are consumed, never computed, by the client: balances and net
//! movement come from the inventory service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BaseId, EquipmentTypeId, RecordId, UserId};

/// A military base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    /// Base ID
    pub id: BaseId,
    /// Display name
    pub name: String,
    /// Location description
    #[serde(default)]
    pub location: Option<String>,
}

/// A kind of equipment tracked in inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    /// Equipment type ID
    pub id: EquipmentTypeId,
    /// Display name (e.g. "M4 Rifle")
    pub name: String,
    /// Category (e.g. "Weapon", "Ammunition")
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}

/// A reference to another entity, either expanded inline or as a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<I> {
    /// Nested object carrying at least an id and a label
    Expanded {
        /// Referenced id
        id: I,
        /// Label (`name`, or `username` for personnel)
        #[serde(default, alias = "username")]
        name: Option<String>,
    },
    /// Bare id
    Id(I),
}

impl<I: std::fmt::Display> Reference<I> {
    /// The referenced id.
    pub fn id(&self) -> &I {
        match self {
            Self::Expanded { id, .. } | Self::Id(id) => id,
        }
    }

    /// Human-readable label, falling back to the id.
    pub fn label(&self) -> String {
        match self {
            Self::Expanded { name: Some(name), .. } => name.clone(),
            Self::Expanded { id, name: None } | Self::Id(id) => id.to_string(),
        }
    }
}

/// Breakdown of the inflows and outflows behind net movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDetails {
    /// Units purchased in the window
    pub purchases: i64,
    /// Units transferred in
    pub transfers_in: i64,
    /// Units transferred out
    pub transfers_out: i64,
}

/// Net movement over the filter window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetMovement {
    /// Inflows minus outflows
    pub total: i64,
    /// Per-source breakdown
    pub details: MovementDetails,
}

/// Filtered dashboard summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Balance at the start of the window
    pub opening_balance: i64,
    /// Balance at the end of the window
    pub closing_balance: i64,
    /// Units assigned to personnel
    pub assigned: i64,
    /// Units expended
    pub expended: i64,
    /// Net movement with breakdown
    pub net_movement: NetMovement,
    /// Filters the service actually applied (role scoping may override)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters_applied: Option<serde_json::Value>,
}

/// A recorded purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Record ID
    pub id: RecordId,
    /// Purchased equipment
    pub equipment_type: Reference<EquipmentTypeId>,
    /// Receiving base
    pub base: Reference<BaseId>,
    /// Units purchased
    pub quantity: u32,
    /// When the purchase was recorded
    pub purchase_date: DateTime<Utc>,
    /// Vendor name
    #[serde(default)]
    pub vendor: Option<String>,
}

/// Lifecycle status of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    /// Delivered
    Completed,
    /// Shipped, not yet received
    InTransit,
    /// Awaiting dispatch
    Pending,
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::InTransit => write!(f, "in transit"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// A recorded inter-base transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Record ID
    pub id: RecordId,
    /// Transferred equipment
    pub equipment_type: Reference<EquipmentTypeId>,
    /// Source base
    pub from_base: Reference<BaseId>,
    /// Destination base
    pub to_base: Reference<BaseId>,
    /// Units transferred
    pub quantity: u32,
    /// When the transfer was recorded
    pub transfer_date: DateTime<Utc>,
    /// Transfer status
    #[serde(default)]
    pub status: Option<TransferStatus>,
}

/// Equipment assigned to personnel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Record ID
    pub id: RecordId,
    /// Assigned equipment
    pub equipment_type: Reference<EquipmentTypeId>,
    /// Receiving person
    #[serde(default)]
    pub assigned_to: Option<Reference<UserId>>,
    /// Units assigned
    pub quantity: u32,
    /// When the assignment was recorded
    pub assignment_date: DateTime<Utc>,
    /// Base the equipment was issued from
    pub issuing_base: Reference<BaseId>,
}

/// Equipment consumed at a base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureRecord {
    /// Record ID
    pub id: RecordId,
    /// Expended equipment
    pub equipment_type: Reference<EquipmentTypeId>,
    /// Base where it was expended
    pub base: Reference<BaseId>,
    /// Units expended
    pub quantity: u32,
    /// When the expenditure was recorded
    pub expenditure_date: DateTime<Utc>,
    /// Reason for the expenditure
    #[serde(default)]
    pub notes: Option<String>,
}
