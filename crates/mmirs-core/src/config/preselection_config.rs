use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::MergeOp;

/// Preselection stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreselectionConfig {
    /// Top-k requested from the focus ranker.
    pub max_num_focus_relevant: usize,
    /// Top-k requested from the context ranker.
    pub max_num_context_relevant: usize,
    /// Hard cap on the merged candidate list.
    pub max_num_relevant: usize,
    /// An intersection smaller than this falls back to the union.
    pub min_num_relevant: usize,
    pub merge_op: MergeOp,
    /// Multiply term-document scores by the term's expansion weight.
    pub weight_by_sim: bool,
    /// Brute-force context search instead of the ANN index.
    pub exact_context_retrieval: bool,
    /// Nearest vocabulary terms fetched per focus token.
    pub top_k_similar: usize,
    /// Overall cap on expanded focus terms.
    pub max_similar: usize,
    /// Seed for the capping shuffle. `None` draws from OS entropy.
    pub shuffle_seed: Option<u64>,
}

impl Default for PreselectionConfig {
    fn default() -> Self {
        Self {
            max_num_focus_relevant: defaults::DEFAULT_MAX_NUM_FOCUS_RELEVANT,
            max_num_context_relevant: defaults::DEFAULT_MAX_NUM_CONTEXT_RELEVANT,
            max_num_relevant: defaults::DEFAULT_MAX_NUM_RELEVANT,
            min_num_relevant: defaults::DEFAULT_MIN_NUM_RELEVANT,
            merge_op: MergeOp::Intersection,
            weight_by_sim: defaults::DEFAULT_WEIGHT_BY_SIM,
            exact_context_retrieval: defaults::DEFAULT_EXACT_CONTEXT_RETRIEVAL,
            top_k_similar: defaults::DEFAULT_TOP_K_SIMILAR,
            max_similar: defaults::DEFAULT_MAX_SIMILAR,
            shuffle_seed: None,
        }
    }
}
