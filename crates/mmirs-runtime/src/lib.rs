//! # mmirs-runtime
//!
//! Owns the configuration, the preselection stage and the pool factory,
//! and runs the two together: candidates first, then their features.

pub mod runtime;
pub mod tracing_setup;

pub use runtime::{MmirsRuntime, SearchSpace};
