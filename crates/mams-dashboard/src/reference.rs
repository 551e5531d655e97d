//! Reference data cache
//!
//! Bases and equipment types populate filter and form selectors. They change
//! rarely and are not tied to a filter epoch, so they are fetched once and
//! kept until [`ReferenceCache::invalidate_all`] is called. Failed fetches are
//! not cached. A caller that waits on another caller's fetch counts as a hit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mams_client::{ClientError, InventoryApi};
use mams_types::{Base, EquipmentType};
use moka::future::Cache;
use tracing::instrument;

use crate::metrics;

/// Cached reference lists.
#[derive(Clone)]
pub struct ReferenceCache {
    bases: Cache<(), Arc<Vec<Base>>>,
    equipment_types: Cache<(), Arc<Vec<EquipmentType>>>,
}

impl std::fmt::Debug for ReferenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceCache")
            .field("bases_cached", &self.bases.contains_key(&()))
            .field("equipment_types_cached", &self.equipment_types.contains_key(&()))
            .finish()
    }
}

impl Default for ReferenceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self {
            bases: Cache::builder().max_capacity(1).build(),
            equipment_types: Cache::builder().max_capacity(1).build(),
        }
    }

    /// All bases, fetched through `api` on a miss.
    ///
    /// Concurrent misses share one fetch and its error.
    #[instrument(skip_all, level = "debug")]
    pub async fn bases<A>(&self, api: &A) -> Result<Arc<Vec<Base>>, Arc<ClientError>>
    where
        A: InventoryApi + ?Sized,
    {
        let fetched = AtomicBool::new(false);
        let bases = self
            .bases
            .try_get_with((), async {
                fetched.store(true, Ordering::Relaxed);
                api.bases().await.map(Arc::new)
            })
            .await;
        metrics::record_cache_lookup("bases", !fetched.load(Ordering::Relaxed));
        bases
    }

    /// All equipment types, fetched through `api` on a miss.
    #[instrument(skip_all, level = "debug")]
    pub async fn equipment_types<A>(
        &self,
        api: &A,
    ) -> Result<Arc<Vec<EquipmentType>>, Arc<ClientError>>
    where
        A: InventoryApi + ?Sized,
    {
        let fetched = AtomicBool::new(false);
        let equipment_types = self
            .equipment_types
            .try_get_with((), async {
                fetched.store(true, Ordering::Relaxed);
                api.equipment_types().await.map(Arc::new)
            })
            .await;
        metrics::record_cache_lookup("equipment_types", !fetched.load(Ordering::Relaxed));
        equipment_types
    }

    /// Drop every cached list.
    pub fn invalidate_all(&self) {
        self.bases.invalidate_all();
        self.equipment_types.invalidate_all();
    }
}
