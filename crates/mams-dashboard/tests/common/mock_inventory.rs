//! Scripted `InventoryApi`
//!
//! Summary fetches park until the test answers them, so tests choose the
//! order in which responses arrive. Record collections live in memory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use mams_client::{ClientError, InventoryApi};
use mams_types::{
    AssignmentRecord, Base, DashboardSummary, EquipmentType, ExpenditureRecord, FilterState,
    NewAssignment, NewExpenditure, NewPurchase, NewTransfer, PurchaseRecord, RecordId, Reference,
    TransferRecord,
};
use tokio::sync::{mpsc, oneshot, Notify};

/// A summary fetch waiting for its response
#[derive(Debug)]
pub struct PendingSummary {
    pub filter: FilterState,
    reply: oneshot::Sender<Result<DashboardSummary, ClientError>>,
}

#[allow(dead_code)]
impl PendingSummary {
    pub fn respond(self, result: Result<DashboardSummary, ClientError>) {
        let _ = self.reply.send(result);
    }

    pub fn base(&self) -> Option<&str> {
        self.filter.base.as_ref().map(|b| b.as_str())
    }
}

pub struct ScriptedInventory {
    pending: mpsc::UnboundedSender<PendingSummary>,
    bases: Mutex<Result<Vec<Base>, ClientError>>,
    bases_gate: Mutex<Option<Arc<Notify>>>,
    purchases: Mutex<Vec<PurchaseRecord>>,
    purchase_list_fails: Mutex<bool>,
    pub bases_calls: AtomicUsize,
    pub equipment_type_calls: AtomicUsize,
    pub purchase_list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedInventory {
    /// Inventory and the receiving end of its summary fetches.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingSummary>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let inventory = Self {
            pending: tx,
            bases: Mutex::new(Ok(vec![base("1", "Fort Alpha"), base("2", "Camp Bravo")])),
            bases_gate: Mutex::new(None),
            purchases: Mutex::new(Vec::new()),
            purchase_list_fails: Mutex::new(false),
            bases_calls: AtomicUsize::new(0),
            equipment_type_calls: AtomicUsize::new(0),
            purchase_list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        };
        (inventory, rx)
    }

    pub fn fail_bases(&self, error: ClientError) {
        *self.bases.lock().unwrap() = Err(error);
    }

    pub fn restore_bases(&self) {
        *self.bases.lock().unwrap() = Ok(vec![base("1", "Fort Alpha")]);
    }

    /// Park base fetches until the returned gate is notified
    pub fn hold_bases(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.bases_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn fail_purchase_list(&self, fail: bool) {
        *self.purchase_list_fails.lock().unwrap() = fail;
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[allow(dead_code)]
pub fn base(id: &str, name: &str) -> Base {
    Base {
        id: id.into(),
        name: name.to_string(),
        location: None,
    }
}

/// Summary distinguishable by its closing balance
#[allow(dead_code)]
pub fn summary(closing_balance: i64) -> DashboardSummary {
    DashboardSummary {
        opening_balance: 100,
        closing_balance,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn purchase(id: &str, form: &NewPurchase) -> PurchaseRecord {
    PurchaseRecord {
        id: RecordId::new(id),
        equipment_type: Reference::Id(form.equipment_type_id.clone()),
        base: Reference::Id(form.base_id.clone()),
        quantity: form.quantity,
        purchase_date: Utc::now(),
        vendor: form.vendor.clone(),
    }
}

fn clone_result<T: Clone>(result: &Result<T, ClientError>) -> Result<T, ClientError> {
    match result {
        Ok(value) => Ok(value.clone()),
        Err(e) => Err(ClientError::Unavailable(e.to_string())),
    }
}

#[async_trait]
impl InventoryApi for ScriptedInventory {
    async fn bases(&self) -> Result<Vec<Base>, ClientError> {
        self.bases_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.bases_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        clone_result(&self.bases.lock().unwrap())
    }

    async fn equipment_types(&self) -> Result<Vec<EquipmentType>, ClientError> {
        self.equipment_type_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![EquipmentType {
            id: "1".into(),
            name: "M4 Rifle".to_string(),
            category: Some("Weapon".to_string()),
            description: None,
        }])
    }

    async fn dashboard_summary(
        &self,
        filter: &FilterState,
    ) -> Result<DashboardSummary, ClientError> {
        let (reply, response) = oneshot::channel();
        self.pending
            .send(PendingSummary {
                filter: filter.clone(),
                reply,
            })
            .map_err(|_| ClientError::Internal("test receiver dropped".into()))?;
        response
            .await
            .map_err(|_| ClientError::Internal("test dropped the request".into()))?
    }

    async fn purchases(&self) -> Result<Vec<PurchaseRecord>, ClientError> {
        self.purchase_list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.purchase_list_fails.lock().unwrap() {
            return Err(ClientError::Unavailable("HTTP 503".into()));
        }
        Ok(self.purchases.lock().unwrap().clone())
    }

    async fn create_purchase(&self, form: &NewPurchase) -> Result<PurchaseRecord, ClientError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut purchases = self.purchases.lock().unwrap();
        let record = purchase(&(purchases.len() + 1).to_string(), form);
        purchases.push(record.clone());
        Ok(record)
    }

    async fn transfers(&self) -> Result<Vec<TransferRecord>, ClientError> {
        Ok(Vec::new())
    }

    async fn create_transfer(&self, _form: &NewTransfer) -> Result<TransferRecord, ClientError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Err(ClientError::Internal("transfers are not scripted".into()))
    }

    async fn assignments(&self) -> Result<Vec<AssignmentRecord>, ClientError> {
        Ok(Vec::new())
    }

    async fn create_assignment(
        &self,
        _form: &NewAssignment,
    ) -> Result<AssignmentRecord, ClientError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Err(ClientError::Internal("assignments are not scripted".into()))
    }

    async fn expenditures(&self) -> Result<Vec<ExpenditureRecord>, ClientError> {
        Ok(Vec::new())
    }

    async fn create_expenditure(
        &self,
        _form: &NewExpenditure,
    ) -> Result<ExpenditureRecord, ClientError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Err(ClientError::Internal("expenditures are not scripted".into()))
    }
}
