use std::sync::Arc;

use crate::config::PoolSettings;
use crate::errors::MmirsResult;
use crate::models::{FeatureRecord, ImageId};

/// Addressable storage of precomputed image features.
pub trait IFeatureStore: Send + Sync {
    /// Every id the store can serve, ascending.
    fn known_ids(&self) -> MmirsResult<Vec<ImageId>>;

    /// Load every record.
    fn fetch_all(&self) -> MmirsResult<Vec<FeatureRecord>>;

    /// Load the records for `ids`. Ids the store does not know are skipped.
    fn fetch_subset(&self, ids: &[ImageId]) -> MmirsResult<Vec<FeatureRecord>>;
}

/// Opens the feature store backing one pool. This is the storage boundary:
/// root location, file prefix, and loader parallelism go in, an addressable
/// store comes out.
pub trait IFeatureStoreOpener: Send + Sync {
    fn open(&self, settings: &PoolSettings) -> MmirsResult<Arc<dyn IFeatureStore>>;
}
