//! # mmirs-pool
//!
//! Precomputed per-image features for fine selection.
//!
//! - [`FeaturePool`]: one (dataset, retriever) store with canonical-id subset
//!   lookups, fully pre-fetched or populated on demand.
//! - [`DataPoolFactory`]: registry of supported combinations and the
//!   single-construction-per-key cache.
//! - [`FileFeatureStore`]: one binary file per image on local disk.

pub mod factory;
pub mod pool;
pub mod store;

pub use factory::DataPoolFactory;
pub use pool::FeaturePool;
pub use store::{FileFeatureStore, FileStoreOpener};
