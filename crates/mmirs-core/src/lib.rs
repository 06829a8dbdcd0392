//! # mmirs-core
//!
//! Foundation crate for the MMIRS candidate-retrieval pipeline.
//! Defines the data model, the external-collaborator traits, errors,
//! config, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::MmirsConfig;
pub use errors::{MmirsError, MmirsResult, Stage};
pub use models::{
    CandidateList, DocumentScoreMap, FeatureRecord, FeatureSubset, IdScheme, ImageId, MergeOp,
    PoolKey, RetrieverType,
};
