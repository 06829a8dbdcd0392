//! Error taxonomy.
//!
//! One enum per subsystem plus the top-level [`MmirsError`]. Configuration
//! errors are permanent; external-service failures surface as
//! [`MmirsError::External`] and are never retried here.

mod config_error;
mod pool_error;
mod retrieval_error;

use std::fmt;

pub use config_error::ConfigError;
pub use pool_error::PoolError;
pub use retrieval_error::RetrievalError;

/// Convenience alias used across the workspace.
pub type MmirsResult<T> = Result<T, MmirsError>;

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Focus,
    Context,
    Merge,
    Pool,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Focus => "focus",
            Stage::Context => "context",
            Stage::Merge => "merge",
            Stage::Pool => "pool",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error for every MMIRS crate.
#[derive(Debug, thiserror::Error)]
pub enum MmirsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("external service {service} failed: {reason}")]
    External { service: String, reason: String },

    #[error("{stage} stage failed: {source}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<MmirsError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MmirsError {
    /// Build an external-service failure.
    pub fn external(service: impl Into<String>, reason: impl Into<String>) -> Self {
        MmirsError::External {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Tag this error with the stage it surfaced from. An error that already
    /// carries a stage keeps the innermost one.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            already @ MmirsError::StageFailed { .. } => already,
            other => MmirsError::StageFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was tagged with, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            MmirsError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Permanent errors must never be retried: they come from configuration,
    /// not from a transient condition.
    pub fn is_permanent(&self) -> bool {
        match self {
            MmirsError::Config(_) => true,
            MmirsError::Pool(e) => e.is_permanent(),
            MmirsError::StageFailed { source, .. } => source.is_permanent(),
            MmirsError::Retrieval(_)
            | MmirsError::External { .. }
            | MmirsError::Io(_)
            | MmirsError::Serialization(_) => false,
        }
    }
}
