//! A (dataset, retriever) feature pool.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use mmirs_core::errors::{MmirsResult, PoolError};
use mmirs_core::models::{FeatureRecord, FeatureSubset, IdScheme, ImageId, PoolKey};
use mmirs_core::traits::IFeatureStore;

/// Every record of the store, materialized once and read-only afterwards.
struct ResidentSet {
    order: Vec<ImageId>,
    by_id: HashMap<ImageId, Arc<FeatureRecord>>,
}

/// Features of one (dataset, retriever) combination.
///
/// Lookups use canonical ids, so `"123"` and `"000123"` address the same
/// COCO image. With `pre_fetch` the whole store is loaded at construction;
/// otherwise records are read on first request and kept resident. Results
/// are identical either way.
pub struct FeaturePool {
    key: PoolKey,
    store: Arc<dyn IFeatureStore>,
    id_scheme: IdScheme,
    /// Canonical id -> id as the store spells it.
    store_ids: HashMap<ImageId, ImageId>,
    all: OnceLock<ResidentSet>,
    full_load: Mutex<()>,
    partial: DashMap<ImageId, Arc<FeatureRecord>>,
}

impl std::fmt::Debug for FeaturePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePool")
            .field("key", &self.key)
            .field("id_scheme", &self.id_scheme)
            .field("fully_resident", &self.is_fully_resident())
            .finish()
    }
}

impl FeaturePool {
    pub fn new(
        key: PoolKey,
        store: Arc<dyn IFeatureStore>,
        id_scheme: IdScheme,
        pre_fetch: bool,
    ) -> MmirsResult<Self> {
        let mut store_ids = HashMap::new();
        for raw in store.known_ids()? {
            store_ids.entry(id_scheme.normalize(raw.as_str())).or_insert(raw);
        }
        let pool = Self {
            key,
            store,
            id_scheme,
            store_ids,
            all: OnceLock::new(),
            full_load: Mutex::new(()),
            partial: DashMap::new(),
        };
        if pre_fetch {
            pool.prefetch()?;
        }
        Ok(pool)
    }

    pub fn key(&self) -> &PoolKey {
        &self.key
    }

    pub fn id_scheme(&self) -> IdScheme {
        self.id_scheme
    }

    pub fn is_fully_resident(&self) -> bool {
        self.all.get().is_some()
    }

    /// Number of records currently held in memory.
    pub fn resident_len(&self) -> usize {
        match self.all.get() {
            Some(all) => all.order.len(),
            None => self.partial.len(),
        }
    }

    /// Canonical ids of every image the backing store can serve.
    pub fn known_ids(&self) -> Vec<ImageId> {
        let mut ids: Vec<ImageId> = self.store_ids.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Load the whole store into memory. Runs at most once per pool.
    pub fn prefetch(&self) -> MmirsResult<()> {
        self.ensure_resident().map(|_| ())
    }

    /// Every record, ascending by canonical id.
    pub fn get_all(&self) -> MmirsResult<FeatureSubset> {
        let all = self.ensure_resident()?;
        let records = all
            .order
            .iter()
            .filter_map(|id| all.by_id.get(id).cloned())
            .collect();
        Ok(FeatureSubset::new(records, Vec::new()))
    }

    /// Features for `image_ids`, in request order with equivalent ids
    /// collapsed. An empty request returns the whole pool. Ids the store
    /// does not know end up in [`FeatureSubset::missing`].
    pub fn get_subset<S: AsRef<str>>(&self, image_ids: &[S]) -> MmirsResult<FeatureSubset> {
        if image_ids.is_empty() {
            return self.get_all();
        }
        let start = Instant::now();
        let wanted = self.id_scheme.normalize_unique(image_ids);

        let (records, missing) = match self.all.get() {
            Some(all) => split_known(&wanted, |id| all.by_id.get(id).cloned()),
            None => {
                self.load_absent(&wanted)?;
                // A concurrent full load may have moved records out of
                // `partial` since the check above.
                split_known(&wanted, |id| {
                    self.partial
                        .get(id)
                        .map(|r| Arc::clone(r.value()))
                        .or_else(|| self.all.get().and_then(|all| all.by_id.get(id).cloned()))
                })
            }
        };

        if !missing.is_empty() {
            warn!(
                pool = %self.key,
                missing = missing.len(),
                first = %missing[0],
                "requested images have no features"
            );
        }
        debug!(
            pool = %self.key,
            requested = wanted.len(),
            found = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "feature subset"
        );
        Ok(FeatureSubset::new(records, missing))
    }

    fn ensure_resident(&self) -> MmirsResult<&ResidentSet> {
        if let Some(all) = self.all.get() {
            return Ok(all);
        }
        let _guard = self.full_load.lock().map_err(|e| PoolError::LockPoisoned {
            reason: e.to_string(),
        })?;
        if let Some(all) = self.all.get() {
            return Ok(all);
        }

        let start = Instant::now();
        let mut order = Vec::new();
        let mut by_id = HashMap::new();
        for record in self.store.fetch_all()? {
            let record = self.canonical(record);
            if !by_id.contains_key(&record.image_id) {
                order.push(record.image_id.clone());
                by_id.insert(record.image_id.clone(), Arc::new(record));
            }
        }
        order.sort();
        let records = order.len();

        // Publish before dropping the partial cache, so a lazy reader that
        // misses in `partial` always finds the record in `all`.
        let all = self.all.get_or_init(move || ResidentSet { order, by_id });
        self.partial.clear();

        info!(
            pool = %self.key,
            records,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "feature pool resident"
        );
        Ok(all)
    }

    fn load_absent(&self, wanted: &[ImageId]) -> MmirsResult<()> {
        let absent: Vec<ImageId> = wanted
            .iter()
            .filter(|id| !self.partial.contains_key(*id))
            .filter_map(|id| self.store_ids.get(id).cloned())
            .collect();
        if absent.is_empty() {
            return Ok(());
        }
        for record in self.store.fetch_subset(&absent)? {
            let record = self.canonical(record);
            self.partial
                .entry(record.image_id.clone())
                .or_insert_with(|| Arc::new(record));
        }
        Ok(())
    }

    fn canonical(&self, mut record: FeatureRecord) -> FeatureRecord {
        record.image_id = self.id_scheme.normalize(record.image_id.as_str());
        record
    }
}

fn split_known(
    wanted: &[ImageId],
    lookup: impl Fn(&ImageId) -> Option<Arc<FeatureRecord>>,
) -> (Vec<Arc<FeatureRecord>>, Vec<ImageId>) {
    let mut records = Vec::with_capacity(wanted.len());
    let mut missing = Vec::new();
    for id in wanted {
        match lookup(id) {
            Some(record) => records.push(record),
            None => missing.push(id.clone()),
        }
    }
    (records, missing)
}
