//! Registry and process-wide cache of feature pools.
//!
//! A pool is built at most once per (dataset, retriever) key for the
//! lifetime of the factory. Concurrent first requests for the same key
//! wait on a single construction and all receive the same instance.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use moka::sync::Cache;
use tracing::{info, warn};

use mmirs_core::config::{MmirsConfig, PoolSettings};
use mmirs_core::errors::{MmirsError, MmirsResult, PoolError};
use mmirs_core::models::{IdScheme, PoolKey, RetrieverType};
use mmirs_core::traits::IFeatureStoreOpener;

use crate::pool::FeaturePool;
use crate::store::FileStoreOpener;

type PoolBuilder = fn(&DataPoolFactory, &PoolKey, &PoolSettings) -> MmirsResult<FeaturePool>;

pub struct DataPoolFactory {
    registry: BTreeMap<PoolKey, PoolSettings>,
    opener: Arc<dyn IFeatureStoreOpener>,
    pools: Cache<PoolKey, Arc<FeaturePool>>,
}

impl DataPoolFactory {
    /// Factory over the configured pools, reading feature files from disk.
    pub fn new(config: &MmirsConfig) -> MmirsResult<Self> {
        Self::with_opener(config, Arc::new(FileStoreOpener))
    }

    pub fn with_opener(
        config: &MmirsConfig,
        opener: Arc<dyn IFeatureStoreOpener>,
    ) -> MmirsResult<Self> {
        config.validate()?;
        let registry: BTreeMap<PoolKey, PoolSettings> = config
            .pool_entries()?
            .into_iter()
            .map(|(key, settings)| (key, settings.clone()))
            .collect();
        info!(pools = registry.len(), "feature pool registry loaded");
        Ok(Self {
            registry,
            opener,
            pools: Cache::builder().build(),
        })
    }

    /// Every supported (dataset, retriever) combination.
    pub fn available_pools(&self) -> Vec<PoolKey> {
        self.registry.keys().cloned().collect()
    }

    pub fn is_built(&self, dataset: &str, retriever: RetrieverType) -> bool {
        self.pools.contains_key(&PoolKey::new(dataset, retriever))
    }

    /// The pool for `(dataset, retriever)`, building it on first use.
    ///
    /// Combinations absent from the registry fail with a permanent
    /// [`PoolError::NotImplemented`].
    pub fn get_or_create(
        &self,
        dataset: &str,
        retriever: RetrieverType,
    ) -> MmirsResult<Arc<FeaturePool>> {
        let key = PoolKey::new(dataset, retriever);
        let settings = self
            .registry
            .get(&key)
            .ok_or_else(|| not_implemented(&key))?;

        let build: PoolBuilder = match key.retriever {
            RetrieverType::Teran => Self::build_teran_pool,
            RetrieverType::Uniter => return Err(not_implemented(&key)),
        };

        self.pools
            .try_get_with(key.clone(), || build(self, &key, settings).map(Arc::new))
            .map_err(|shared| unshare(&key, shared))
    }

    /// Build every registered pool. Combinations without a builder are
    /// skipped with a warning; any other failure aborts.
    pub fn create_and_cache_all(&self) -> MmirsResult<usize> {
        let mut built = 0;
        for key in self.registry.keys() {
            match self.get_or_create(&key.dataset, key.retriever) {
                Ok(_) => built += 1,
                Err(e) if e.is_permanent() => {
                    warn!(pool = %key, error = %e, "skipping pool");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(built)
    }

    fn build_teran_pool(&self, key: &PoolKey, settings: &PoolSettings) -> MmirsResult<FeaturePool> {
        let start = Instant::now();
        let store = self.opener.open(settings)?;
        let scheme = IdScheme::resolve(&key.dataset, settings.id_width);
        let pool = FeaturePool::new(key.clone(), store, scheme, settings.pre_fetch)?;
        info!(
            pool = %key,
            root = %settings.feats_root.display(),
            pre_fetch = settings.pre_fetch,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "feature pool built"
        );
        Ok(pool)
    }
}

fn not_implemented(key: &PoolKey) -> MmirsError {
    PoolError::NotImplemented {
        dataset: key.dataset.clone(),
        retriever: key.retriever.to_string(),
    }
    .into()
}

/// Construction errors are shared between every caller that waited on the
/// same build. A sole owner gets the error itself back.
fn unshare(key: &PoolKey, shared: Arc<MmirsError>) -> MmirsError {
    Arc::try_unwrap(shared).unwrap_or_else(|shared| {
        PoolError::ConstructionFailed {
            key: key.to_string(),
            reason: shared.to_string(),
        }
        .into()
    })
}
