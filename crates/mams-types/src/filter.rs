//! Dashboard filter state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{BaseId, EquipmentTypeId};

/// User-selected dashboard filter.
///
/// Every field is optional; absent or empty fields are left out of the query
/// so the service applies its own defaults (all bases, all equipment, no date
/// bounds).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Base to scope the summary to
    pub base: Option<BaseId>,
    /// Equipment type to scope the summary to
    pub equipment_type: Option<EquipmentTypeId>,
    /// Inclusive start of the movement window
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the movement window
    pub end_date: Option<NaiveDate>,
}

impl FilterState {
    /// An empty filter (everything visible to the caller).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base filter.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<BaseId>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Set the equipment type filter.
    #[must_use]
    pub fn with_equipment_type(mut self, equipment_type: impl Into<EquipmentTypeId>) -> Self {
        self.equipment_type = Some(equipment_type.into());
        self
    }

    /// Set the date window.
    #[must_use]
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Query parameters for the summary endpoint, non-empty fields only.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(base) = self.base.as_ref().filter(|b| !b.is_empty()) {
            pairs.push(("base", base.to_string()));
        }
        if let Some(eq) = self.equipment_type.as_ref().filter(|e| !e.is_empty()) {
            pairs.push(("equipment_type", eq.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
