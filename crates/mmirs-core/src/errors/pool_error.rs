use std::path::PathBuf;

/// Feature pool subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("{dataset} image pool for {retriever} retriever is not implemented")]
    NotImplemented { dataset: String, retriever: String },

    #[error("corrupt feature file {path}: {reason}")]
    CorruptFeatureFile { path: PathBuf, reason: String },

    #[error("feature root {path} is not readable: {reason}")]
    RootUnreadable { path: PathBuf, reason: String },

    #[error("failed to build loader pool: {reason}")]
    WorkerPool { reason: String },

    #[error("building pool {key} failed: {reason}")]
    ConstructionFailed { key: String, reason: String },

    #[error("pool lock poisoned: {reason}")]
    LockPoisoned { reason: String },
}

impl PoolError {
    /// Only the unsupported-combination error is permanent; storage
    /// problems may clear up on a later request.
    pub fn is_permanent(&self) -> bool {
        matches!(self, PoolError::NotImplemented { .. })
    }
}
