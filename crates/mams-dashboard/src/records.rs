//! Record list screens
//!
//! A [`RecordLoader`] holds the last fetched list for one record kind and
//! submits new records. Forms are validated before anything is sent, and a
//! successful create reloads the list.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mams_client::{ClientError, InventoryApi};
use mams_types::{
    AssignmentRecord, ExpenditureRecord, NewAssignment, NewExpenditure, NewPurchase, NewTransfer,
    PurchaseRecord, TransferRecord, Validate,
};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::signal::SyncSignal;

/// A record collection with its list and create operations.
#[async_trait]
pub trait RecordKind: Send + Sync + 'static {
    /// Listed record
    type Record: Clone + std::fmt::Debug + Send + Sync + 'static;
    /// Create form
    type Form: Validate + std::fmt::Debug + Send + Sync;

    /// Name used in logs
    const NAME: &'static str;

    async fn list<A>(api: &A) -> Result<Vec<Self::Record>, ClientError>
    where
        A: InventoryApi + ?Sized;

    async fn create<A>(api: &A, form: &Self::Form) -> Result<Self::Record, ClientError>
    where
        A: InventoryApi + ?Sized;
}

/// Purchases of new equipment
#[derive(Debug, Clone, Copy)]
pub struct Purchases;

#[async_trait]
impl RecordKind for Purchases {
    type Record = PurchaseRecord;
    type Form = NewPurchase;
    const NAME: &'static str = "purchases";

    async fn list<A>(api: &A) -> Result<Vec<PurchaseRecord>, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.purchases().await
    }

    async fn create<A>(api: &A, form: &NewPurchase) -> Result<PurchaseRecord, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.create_purchase(form).await
    }
}

/// Transfers between bases
#[derive(Debug, Clone, Copy)]
pub struct Transfers;

#[async_trait]
impl RecordKind for Transfers {
    type Record = TransferRecord;
    type Form = NewTransfer;
    const NAME: &'static str = "transfers";

    async fn list<A>(api: &A) -> Result<Vec<TransferRecord>, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.transfers().await
    }

    async fn create<A>(api: &A, form: &NewTransfer) -> Result<TransferRecord, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.create_transfer(form).await
    }
}

/// Equipment assigned to personnel
#[derive(Debug, Clone, Copy)]
pub struct Assignments;

#[async_trait]
impl RecordKind for Assignments {
    type Record = AssignmentRecord;
    type Form = NewAssignment;
    const NAME: &'static str = "assignments";

    async fn list<A>(api: &A) -> Result<Vec<AssignmentRecord>, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.assignments().await
    }

    async fn create<A>(api: &A, form: &NewAssignment) -> Result<AssignmentRecord, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.create_assignment(form).await
    }
}

/// Equipment consumed at a base
#[derive(Debug, Clone, Copy)]
pub struct Expenditures;

#[async_trait]
impl RecordKind for Expenditures {
    type Record = ExpenditureRecord;
    type Form = NewExpenditure;
    const NAME: &'static str = "expenditures";

    async fn list<A>(api: &A) -> Result<Vec<ExpenditureRecord>, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.expenditures().await
    }

    async fn create<A>(api: &A, form: &NewExpenditure) -> Result<ExpenditureRecord, ClientError>
    where
        A: InventoryApi + ?Sized,
    {
        api.create_expenditure(form).await
    }
}

/// Last fetched list for one record kind.
pub struct RecordLoader<K: RecordKind, A: ?Sized> {
    api: Arc<A>,
    records: watch::Sender<Vec<K::Record>>,
    _kind: PhantomData<K>,
}

impl<K: RecordKind, A: ?Sized> std::fmt::Debug for RecordLoader<K, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLoader")
            .field("kind", &K::NAME)
            .field("records", &self.records.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<K, A> RecordLoader<K, A>
where
    K: RecordKind,
    A: InventoryApi + ?Sized,
{
    pub fn new(api: Arc<A>) -> Self {
        let (records, _) = watch::channel(Vec::new());
        Self {
            api,
            records,
            _kind: PhantomData,
        }
    }

    /// Records from the last successful load
    pub fn records(&self) -> Vec<K::Record> {
        self.records.borrow().clone()
    }

    /// Subscribe to list changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<K::Record>> {
        self.records.subscribe()
    }

    /// Fetch the list. On failure the previous list is kept.
    #[instrument(skip(self), fields(kind = K::NAME), level = "debug")]
    pub async fn load(&self) -> Result<Vec<K::Record>, ClientError> {
        match K::list(self.api.as_ref()).await {
            Ok(records) => {
                self.records.send_replace(records.clone());
                Ok(records)
            }
            Err(e) => {
                warn!(kind = K::NAME, signal = %SyncSignal::from_error(&e), "failed to load records: {}", e);
                Err(e)
            }
        }
    }

    /// Validate and submit `form`, then reload the list.
    ///
    /// An invalid form is rejected without a request. The created record is
    /// returned even if the reload afterwards fails.
    #[instrument(skip(self), fields(kind = K::NAME), level = "debug")]
    pub async fn submit(&self, form: &K::Form) -> Result<K::Record, ClientError> {
        form.validate()?;

        let created = K::create(self.api.as_ref(), form).await?;
        info!(kind = K::NAME, "record created");

        if let Err(e) = self.load().await {
            warn!(kind = K::NAME, "record created but reload failed: {}", e);
        }
        Ok(created)
    }
}
