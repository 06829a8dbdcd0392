//! Dependency root for a retrieval process.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use mmirs_core::errors::{MmirsResult, Stage};
use mmirs_core::models::{CandidateList, FeatureSubset, PoolKey, RetrieverType};
use mmirs_core::MmirsConfig;
use mmirs_pool::{DataPoolFactory, FeaturePool};
use mmirs_preselection::{PreselectionRequest, PreselectionStage};

use crate::{pool_span, preselection_span};

/// Candidates of one query together with their features, ready for fine
/// selection.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    pub candidates: CandidateList,
    pub features: FeatureSubset,
}

/// Built once per process. Cheap to clone; clones share the stage and
/// the pool cache.
#[derive(Clone)]
pub struct MmirsRuntime {
    config: Arc<MmirsConfig>,
    preselection: Arc<PreselectionStage>,
    pools: Arc<DataPoolFactory>,
}

impl MmirsRuntime {
    pub fn new(config: MmirsConfig, preselection: PreselectionStage, pools: DataPoolFactory) -> Self {
        info!(
            datasets = ?preselection.datasets(),
            pools = pools.available_pools().len(),
            "runtime assembled"
        );
        Self {
            config: Arc::new(config),
            preselection: Arc::new(preselection),
            pools: Arc::new(pools),
        }
    }

    /// Runtime whose pools read feature files from the configured roots.
    pub fn from_config(config: MmirsConfig, preselection: PreselectionStage) -> MmirsResult<Self> {
        let pools = DataPoolFactory::new(&config)?;
        Ok(Self::new(config, preselection, pools))
    }

    pub fn config(&self) -> &MmirsConfig {
        &self.config
    }

    pub fn preselection(&self) -> &PreselectionStage {
        &self.preselection
    }

    /// Build every registered pool now instead of on first request.
    pub fn warm_start(&self) -> MmirsResult<usize> {
        let start = Instant::now();
        let built = self.pools.create_and_cache_all()?;
        info!(
            built,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "warm start complete"
        );
        Ok(built)
    }

    pub fn available_pools(&self) -> Vec<PoolKey> {
        self.pools.available_pools()
    }

    pub fn pool(&self, dataset: &str, retriever: RetrieverType) -> MmirsResult<Arc<FeaturePool>> {
        self.pools
            .get_or_create(dataset, retriever)
            .map_err(|e| e.in_stage(Stage::Pool))
    }

    /// Preselection only.
    pub fn preselect(&self, request: &PreselectionRequest) -> MmirsResult<CandidateList> {
        let merge_op = request
            .merge_op
            .unwrap_or(self.preselection.config().merge_op);
        let _span = preselection_span!(request.dataset, merge_op).entered();
        self.preselection.retrieve_relevant_images(request)
    }

    /// Preselect candidates for `request`, then fetch their features from
    /// the `(request.dataset, retriever)` pool. No candidates means no
    /// features, not the whole pool.
    pub fn search_space(
        &self,
        request: &PreselectionRequest,
        retriever: RetrieverType,
    ) -> MmirsResult<SearchSpace> {
        let start = Instant::now();
        let candidates = self.preselect(request)?;

        let pool = self.pool(&request.dataset, retriever)?;
        let features = if candidates.is_empty() {
            FeatureSubset::default()
        } else {
            let _span = pool_span!(pool.key(), candidates.len()).entered();
            pool.get_subset(candidates.ids())
                .map_err(|e| e.in_stage(Stage::Pool))?
        };

        info!(
            dataset = %request.dataset,
            %retriever,
            candidates = candidates.len(),
            features = features.len(),
            missing = features.missing().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search space ready"
        );
        Ok(SearchSpace {
            candidates,
            features,
        })
    }
}
