//! Feature storage backends.

pub mod codec;
mod file_store;

pub use file_store::{FileFeatureStore, FileStoreOpener};
