//! Span macros per pipeline operation.

/// Span around one preselection request.
#[macro_export]
macro_rules! preselection_span {
    ($dataset:expr, $merge_op:expr) => {
        tracing::info_span!("mmirs.preselection", dataset = %$dataset, merge_op = %$merge_op)
    };
}

/// Span around one feature pool access.
#[macro_export]
macro_rules! pool_span {
    ($pool:expr, $requested:expr) => {
        tracing::info_span!("mmirs.pool", pool = %$pool, requested = $requested)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const PRESELECTION: &str = "mmirs.preselection";
    pub const POOL: &str = "mmirs.pool";
}
