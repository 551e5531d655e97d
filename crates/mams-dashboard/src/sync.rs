//! Filter-driven summary synchronisation
//!
//! Every filter change starts a new fetch epoch. Fetches are never cancelled;
//! a response is applied only if its epoch is still current when it arrives,
//! so an older response landing after a newer one is dropped. The epoch check
//! and the view write happen in one `send_if_modified` closure.

use std::sync::Arc;

use mams_client::{ClientError, InventoryApi};
use mams_types::{Base, BaseId, DashboardSummary, EquipmentType, FilterState, Identity, Role};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::metrics;
use crate::reference::ReferenceCache;
use crate::signal::SyncSignal;

/// Dashboard state published to subscribers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Epoch of the most recent filter change
    pub epoch: u64,
    /// Filter the current epoch was issued for
    pub filter: FilterState,
    /// Last successfully applied summary
    pub summary: Option<DashboardSummary>,
    /// A fetch for the current epoch is outstanding
    pub loading: bool,
    /// Failure of the current epoch's fetch, if it failed
    pub signal: Option<SyncSignal>,
}

/// What happened to a dispatched fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The summary was displayed
    Applied,
    /// A newer filter was issued first; the response was dropped
    Superseded,
    /// The fetch failed; the previous summary stays displayed
    Failed(SyncSignal),
}

/// Coordinates summary fetches against the latest filter.
pub struct DataSyncController<A: ?Sized> {
    api: Arc<A>,
    view: Arc<watch::Sender<DashboardView>>,
    reference: ReferenceCache,
    pinned_base: Option<BaseId>,
}

impl<A: ?Sized> std::fmt::Debug for DataSyncController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSyncController")
            .field("view", &*self.view.borrow())
            .field("pinned_base", &self.pinned_base)
            .finish_non_exhaustive()
    }
}

impl<A> DataSyncController<A>
where
    A: InventoryApi + ?Sized + 'static,
{
    /// Create a controller with an empty view.
    pub fn new(api: Arc<A>) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self {
            api,
            view: Arc::new(view),
            reference: ReferenceCache::new(),
            pinned_base: None,
        }
    }

    /// Scope the controller to `identity`.
    ///
    /// Base commanders only ever see their own base: the base filter is
    /// replaced with their base scope on every change.
    #[must_use]
    pub fn with_identity(mut self, identity: &Identity) -> Self {
        self.pinned_base = match identity.role() {
            Role::BaseCommander => identity.base_scope().cloned(),
            Role::Admin | Role::LogisticsOfficer => None,
        };
        self
    }

    /// Base every filter is pinned to, if any
    pub fn pinned_base(&self) -> Option<&BaseId> {
        self.pinned_base.as_ref()
    }

    /// Current view
    pub fn view(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    /// Subscribe to view changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view.subscribe()
    }

    /// Current fetch epoch
    pub fn epoch(&self) -> u64 {
        self.view.borrow().epoch
    }

    /// Replace the filter and fetch the summary for it.
    ///
    /// The new epoch is taken before this returns, so filter changes are
    /// ordered by call order regardless of when their responses arrive. The
    /// returned handle resolves once the response was applied or dropped.
    pub fn set_filter(&self, filter: FilterState) -> JoinHandle<FetchOutcome> {
        self.dispatch(self.pin(filter))
    }

    /// Re-issue the current filter under a new epoch.
    pub fn retry(&self) -> JoinHandle<FetchOutcome> {
        let filter = self.view.borrow().filter.clone();
        self.dispatch(filter)
    }

    /// All bases, cached after the first successful fetch.
    pub async fn bases(&self) -> Result<Arc<Vec<Base>>, Arc<ClientError>> {
        self.reference.bases(self.api.as_ref()).await
    }

    /// All equipment types, cached after the first successful fetch.
    pub async fn equipment_types(&self) -> Result<Arc<Vec<EquipmentType>>, Arc<ClientError>> {
        self.reference.equipment_types(self.api.as_ref()).await
    }

    /// Drop cached bases and equipment types; the next lookup refetches.
    pub fn invalidate_reference_data(&self) {
        self.reference.invalidate_all();
    }

    fn pin(&self, mut filter: FilterState) -> FilterState {
        if let Some(base) = &self.pinned_base {
            if filter.base.as_ref() != Some(base) {
                debug!(requested = ?filter.base, pinned = %base, "base filter pinned to base scope");
                filter.base = Some(base.clone());
            }
        }
        filter
    }

    fn dispatch(&self, filter: FilterState) -> JoinHandle<FetchOutcome> {
        let mut epoch = 0;
        self.view.send_modify(|view| {
            view.epoch += 1;
            view.filter = filter.clone();
            view.loading = true;
            epoch = view.epoch;
        });
        debug!(epoch, "dispatching summary fetch");

        let api = Arc::clone(&self.api);
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            let result = api.dashboard_summary(&filter).await;
            apply(&view, epoch, result)
        })
    }
}

/// Apply `result` if `epoch` is still current.
fn apply(
    view: &watch::Sender<DashboardView>,
    epoch: u64,
    result: Result<DashboardSummary, ClientError>,
) -> FetchOutcome {
    let mut outcome = FetchOutcome::Superseded;

    view.send_if_modified(|view| {
        if view.epoch != epoch {
            return false;
        }
        match result {
            Ok(summary) => {
                view.summary = Some(summary);
                view.signal = None;
                outcome = FetchOutcome::Applied;
            }
            Err(e) => {
                let signal = SyncSignal::from_error(&e);
                warn!(epoch, error = %e, "summary fetch failed");
                view.signal = Some(signal);
                outcome = FetchOutcome::Failed(signal);
            }
        }
        view.loading = false;
        true
    });

    if outcome == FetchOutcome::Superseded {
        debug!(epoch, "discarding stale summary response");
        metrics::record_stale_response();
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(closing: i64) -> DashboardSummary {
        DashboardSummary {
            closing_balance: closing,
            ..Default::default()
        }
    }

    fn view_at(epoch: u64) -> watch::Sender<DashboardView> {
        watch::channel(DashboardView {
            epoch,
            loading: true,
            ..Default::default()
        })
        .0
    }

    #[test]
    fn test_apply_current_epoch() {
        let view = view_at(3);
        assert_eq!(apply(&view, 3, Ok(summary(10))), FetchOutcome::Applied);

        let view = view.borrow();
        assert_eq!(view.summary, Some(summary(10)));
        assert!(!view.loading);
    }

    #[test]
    fn test_apply_stale_epoch_is_dropped() {
        let view = view_at(3);
        assert_eq!(apply(&view, 2, Ok(summary(10))), FetchOutcome::Superseded);

        let view = view.borrow();
        assert!(view.summary.is_none());
        assert!(view.loading);
    }

    #[test]
    fn test_failure_keeps_previous_summary() {
        let view = view_at(1);
        apply(&view, 1, Ok(summary(10)));
        view.send_modify(|v| v.epoch = 2);

        let outcome = apply(&view, 2, Err(ClientError::Unavailable("HTTP 503".into())));
        assert_eq!(outcome, FetchOutcome::Failed(SyncSignal::Retryable));

        let view = view.borrow();
        assert_eq!(view.summary, Some(summary(10)));
        assert_eq!(view.signal, Some(SyncSignal::Retryable));
    }

    #[test]
    fn test_success_clears_signal() {
        let view = view_at(1);
        apply(&view, 1, Err(ClientError::Unauthenticated("expired".into())));
        assert_eq!(view.borrow().signal, Some(SyncSignal::SessionExpired));

        view.send_modify(|v| v.epoch = 2);
        apply(&view, 2, Ok(summary(5)));
        assert!(view.borrow().signal.is_none());
    }
}
