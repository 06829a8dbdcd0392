use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Settings for one (dataset, retriever) feature pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Directory holding the per-image feature files.
    pub feats_root: PathBuf,
    /// File name prefix in front of the image id.
    #[serde(default)]
    pub fn_prefix: String,
    /// Load the whole store into memory when the pool is built.
    #[serde(default = "default_pre_fetch")]
    pub pre_fetch: bool,
    /// Loader threads used when reading feature files.
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
    /// Zero-pad numeric ids to this width. Falls back to the dataset's
    /// built-in scheme when unset.
    #[serde(default)]
    pub id_width: Option<usize>,
}

impl PoolSettings {
    pub fn new(feats_root: impl Into<PathBuf>) -> Self {
        Self {
            feats_root: feats_root.into(),
            fn_prefix: String::new(),
            pre_fetch: defaults::DEFAULT_PRE_FETCH,
            num_workers: defaults::DEFAULT_NUM_WORKERS,
            id_width: None,
        }
    }
}

fn default_pre_fetch() -> bool {
    defaults::DEFAULT_PRE_FETCH
}

fn default_num_workers() -> usize {
    defaults::DEFAULT_NUM_WORKERS
}
