//! Inventory endpoints
//!
//! Reference data, the filtered dashboard summary, and the four record
//! collections. Forms are validated locally; an invalid form never reaches
//! the network.

use async_trait::async_trait;
use mams_types::{
    AssignmentRecord, Base, DashboardSummary, EquipmentType, ExpenditureRecord, FilterState,
    NewAssignment, NewExpenditure, NewPurchase, NewTransfer, PurchaseRecord, TransferRecord,
    Validate,
};
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::metrics::Endpoint;

/// Read and write operations on inventory data.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// All bases.
    async fn bases(&self) -> Result<Vec<Base>, ClientError>;

    /// All equipment types.
    async fn equipment_types(&self) -> Result<Vec<EquipmentType>, ClientError>;

    /// Summary for the given filter. Empty filter fields are omitted.
    async fn dashboard_summary(&self, filter: &FilterState)
        -> Result<DashboardSummary, ClientError>;

    async fn purchases(&self) -> Result<Vec<PurchaseRecord>, ClientError>;
    async fn create_purchase(&self, form: &NewPurchase) -> Result<PurchaseRecord, ClientError>;

    async fn transfers(&self) -> Result<Vec<TransferRecord>, ClientError>;
    async fn create_transfer(&self, form: &NewTransfer) -> Result<TransferRecord, ClientError>;

    async fn assignments(&self) -> Result<Vec<AssignmentRecord>, ClientError>;
    async fn create_assignment(
        &self,
        form: &NewAssignment,
    ) -> Result<AssignmentRecord, ClientError>;

    async fn expenditures(&self) -> Result<Vec<ExpenditureRecord>, ClientError>;
    async fn create_expenditure(
        &self,
        form: &NewExpenditure,
    ) -> Result<ExpenditureRecord, ClientError>;
}

#[async_trait]
impl InventoryApi for ApiClient {
    #[instrument(skip(self), level = "debug")]
    async fn bases(&self) -> Result<Vec<Base>, ClientError> {
        self.get_json(Endpoint::Bases, &[]).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn equipment_types(&self) -> Result<Vec<EquipmentType>, ClientError> {
        self.get_json(Endpoint::EquipmentTypes, &[]).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn dashboard_summary(
        &self,
        filter: &FilterState,
    ) -> Result<DashboardSummary, ClientError> {
        self.get_json(Endpoint::DashboardSummary, &filter.query_pairs())
            .await
    }

    async fn purchases(&self) -> Result<Vec<PurchaseRecord>, ClientError> {
        self.get_json(Endpoint::Purchases, &[]).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn create_purchase(&self, form: &NewPurchase) -> Result<PurchaseRecord, ClientError> {
        form.validate()?;
        self.post_json(Endpoint::Purchases, form).await
    }

    async fn transfers(&self) -> Result<Vec<TransferRecord>, ClientError> {
        self.get_json(Endpoint::Transfers, &[]).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn create_transfer(&self, form: &NewTransfer) -> Result<TransferRecord, ClientError> {
        form.validate()?;
        self.post_json(Endpoint::Transfers, form).await
    }

    async fn assignments(&self) -> Result<Vec<AssignmentRecord>, ClientError> {
        self.get_json(Endpoint::Assignments, &[]).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn create_assignment(
        &self,
        form: &NewAssignment,
    ) -> Result<AssignmentRecord, ClientError> {
        form.validate()?;
        self.post_json(Endpoint::Assignments, form).await
    }

    async fn expenditures(&self) -> Result<Vec<ExpenditureRecord>, ClientError> {
        self.get_json(Endpoint::Expenditures, &[]).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn create_expenditure(
        &self,
        form: &NewExpenditure,
    ) -> Result<ExpenditureRecord, ClientError> {
        form.validate()?;
        self.post_json(Endpoint::Expenditures, form).await
    }
}
