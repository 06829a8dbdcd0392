//! Data model shared by preselection and the feature pools.

pub mod candidate_list;
pub mod document_scores;
pub mod feature;
pub mod image_id;
pub mod merge_op;
pub mod pool_key;

pub use candidate_list::CandidateList;
pub use document_scores::DocumentScoreMap;
pub use feature::{FeatureRecord, FeatureSubset};
pub use image_id::{IdScheme, ImageId};
pub use merge_op::MergeOp;
pub use pool_key::{PoolKey, RetrieverType};
