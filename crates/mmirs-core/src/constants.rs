/// MMIRS system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width of the zero-padded numeric image ids used by COCO.
pub const COCO_ID_WIDTH: usize = 6;

/// Dataset name for COCO.
pub const DATASET_COCO: &str = "coco";

/// Byte length of the feature file header (rows: u32, dims: u32).
pub const FEATURE_HEADER_BYTES: usize = 8;

/// File extension of per-image feature files.
pub const FEATURE_FILE_EXTENSION: &str = "bin";

/// Upper bound on the worker threads a single pool may spin up for loading.
pub const MAX_POOL_WORKERS: usize = 64;
