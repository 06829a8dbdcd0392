/// Preselection subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("invalid sentence embedding corpus: {reason}")]
    InvalidCorpus { reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("rng lock poisoned: {reason}")]
    RngPoisoned { reason: String },
}
