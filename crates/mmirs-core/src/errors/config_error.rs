/// Configuration errors. Always permanent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("merge operation {value:?} not implemented")]
    UnknownMergeOp { value: String },

    #[error("retriever type {value:?} not implemented")]
    UnknownRetriever { value: String },

    #[error("dataset {dataset:?} has no registered preselection rankers")]
    DatasetNotRegistered { dataset: String },

    #[error("invalid setting {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to parse config: {reason}")]
    Parse { reason: String },
}
