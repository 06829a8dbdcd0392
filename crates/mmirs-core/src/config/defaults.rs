// Single source of truth for all default values.

// --- Preselection ---
pub const DEFAULT_MAX_NUM_FOCUS_RELEVANT: usize = 5_000;
pub const DEFAULT_MAX_NUM_CONTEXT_RELEVANT: usize = 5_000;
pub const DEFAULT_MAX_NUM_RELEVANT: usize = 5_000;
pub const DEFAULT_MIN_NUM_RELEVANT: usize = 500;
pub const DEFAULT_WEIGHT_BY_SIM: bool = false;
pub const DEFAULT_EXACT_CONTEXT_RETRIEVAL: bool = false;

// --- Term expansion ---
pub const DEFAULT_TOP_K_SIMILAR: usize = 10;
pub const DEFAULT_MAX_SIMILAR: usize = 50;

// --- Feature pools ---
pub const DEFAULT_PRE_FETCH: bool = false;
pub const DEFAULT_NUM_WORKERS: usize = 8;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
