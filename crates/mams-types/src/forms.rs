//! New-record forms
//!
//! Each form is validated locally before dispatch; an invalid form is never
//! sent to the inventory service.

use serde::{Deserialize, Serialize};

use crate::{BaseId, EquipmentTypeId, UserId, ValidationError};

/// Local validation of a form before it is submitted.
pub trait Validate {
    /// Returns the first problem found, if any.
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require<T: AsRef<str>>(value: &T, field: &'static str) -> Result<(), ValidationError> {
    if value.as_ref().trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

fn require_quantity(quantity: u32) -> Result<(), ValidationError> {
    if quantity == 0 {
        Err(ValidationError::ZeroQuantity)
    } else {
        Ok(())
    }
}

/// Record a purchase of new equipment for a base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    /// Equipment being purchased
    pub equipment_type_id: EquipmentTypeId,
    /// Receiving base
    pub base_id: BaseId,
    /// Units purchased
    pub quantity: u32,
    /// Vendor name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl Validate for NewPurchase {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.equipment_type_id, "equipment type")?;
        require(&self.base_id, "base")?;
        require_quantity(self.quantity)
    }
}

/// Move equipment from one base to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransfer {
    /// Equipment being moved
    pub equipment_type_id: EquipmentTypeId,
    /// Source base
    pub from_base_id: BaseId,
    /// Destination base
    pub to_base_id: BaseId,
    /// Units moved
    pub quantity: u32,
}

impl Validate for NewTransfer {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.equipment_type_id, "equipment type")?;
        require(&self.from_base_id, "source base")?;
        require(&self.to_base_id, "destination base")?;
        if self.from_base_id == self.to_base_id {
            return Err(ValidationError::SameBase);
        }
        require_quantity(self.quantity)
    }
}

/// Assign equipment to a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    /// Equipment being assigned
    pub equipment_type_id: EquipmentTypeId,
    /// Receiving person
    pub assigned_to_id: UserId,
    /// Base issuing the equipment
    pub issuing_base_id: BaseId,
    /// Units assigned
    pub quantity: u32,
}

impl Validate for NewAssignment {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.equipment_type_id, "equipment type")?;
        require(&self.assigned_to_id, "assignee")?;
        require(&self.issuing_base_id, "issuing base")?;
        require_quantity(self.quantity)
    }
}

/// Record equipment consumed at a base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpenditure {
    /// Equipment consumed
    pub equipment_type_id: EquipmentTypeId,
    /// Base where it was consumed
    pub base_id: BaseId,
    /// Units consumed
    pub quantity: u32,
    /// Reason, e.g. "Training Exercise Alpha"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for NewExpenditure {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.equipment_type_id, "equipment type")?;
        require(&self.base_id, "base")?;
        require_quantity(self.quantity)
    }
}
