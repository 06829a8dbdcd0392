//! One binary feature file per image under a root directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use mmirs_core::config::PoolSettings;
use mmirs_core::constants::FEATURE_FILE_EXTENSION;
use mmirs_core::errors::{MmirsResult, PoolError};
use mmirs_core::models::{FeatureRecord, ImageId};
use mmirs_core::traits::{IFeatureStore, IFeatureStoreOpener};

use super::codec;

/// Feature files named `{fn_prefix}{image_id}.bin` in `feats_root`.
///
/// The directory is listed once when the store is opened. Loads run on a
/// dedicated rayon pool sized by `num_workers`.
pub struct FileFeatureStore {
    root: PathBuf,
    prefix: String,
    known: BTreeSet<ImageId>,
    loaders: ThreadPool,
}

impl FileFeatureStore {
    pub fn open(settings: &PoolSettings) -> MmirsResult<Self> {
        let root = settings.feats_root.clone();
        let known = list_ids(&root, &settings.fn_prefix)?;

        let loaders = ThreadPoolBuilder::new()
            .num_threads(settings.num_workers.max(1))
            .thread_name(|i| format!("mmirs-feature-loader-{i}"))
            .build()
            .map_err(|e| PoolError::WorkerPool {
                reason: e.to_string(),
            })?;

        debug!(
            root = %root.display(),
            prefix = %settings.fn_prefix,
            files = known.len(),
            workers = settings.num_workers,
            "opened feature store"
        );

        Ok(Self {
            root,
            prefix: settings.fn_prefix.clone(),
            known,
            loaders,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ImageId) -> PathBuf {
        self.root
            .join(format!("{}{}.{}", self.prefix, id, FEATURE_FILE_EXTENSION))
    }

    fn read(&self, id: &ImageId) -> MmirsResult<FeatureRecord> {
        let path = self.path_for(id);
        let bytes = fs::read(&path)?;
        codec::decode(id.clone(), &bytes, &path)
    }

    fn load<'a>(&self, ids: impl Iterator<Item = &'a ImageId>) -> MmirsResult<Vec<FeatureRecord>> {
        let ids: Vec<&ImageId> = ids.collect();
        let start = Instant::now();
        let records = self
            .loaders
            .install(|| ids.par_iter().map(|id| self.read(id)).collect::<MmirsResult<Vec<_>>>())?;
        debug!(
            root = %self.root.display(),
            loaded = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded feature files"
        );
        Ok(records)
    }
}

impl IFeatureStore for FileFeatureStore {
    fn known_ids(&self) -> MmirsResult<Vec<ImageId>> {
        Ok(self.known.iter().cloned().collect())
    }

    fn fetch_all(&self) -> MmirsResult<Vec<FeatureRecord>> {
        self.load(self.known.iter())
    }

    fn fetch_subset(&self, ids: &[ImageId]) -> MmirsResult<Vec<FeatureRecord>> {
        self.load(ids.iter().filter(|id| self.known.contains(*id)))
    }
}

/// Ids of every `{prefix}{id}.bin` file directly under `root`.
fn list_ids(root: &Path, prefix: &str) -> MmirsResult<BTreeSet<ImageId>> {
    let unreadable = |e: std::io::Error| PoolError::RootUnreadable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    };

    let mut ids = BTreeSet::new();
    for entry in fs::read_dir(root).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        if !entry.file_type().map_err(unreadable)?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(FEATURE_FILE_EXTENSION) {
            continue;
        }
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| stem.strip_prefix(prefix))
            .filter(|id| !id.is_empty());
        if let Some(id) = id {
            ids.insert(ImageId::from(id));
        }
    }
    Ok(ids)
}

/// Opens a [`FileFeatureStore`] per pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStoreOpener;

impl IFeatureStoreOpener for FileStoreOpener {
    fn open(&self, settings: &PoolSettings) -> MmirsResult<Arc<dyn IFeatureStore>> {
        let store = FileFeatureStore::open(settings)?;
        info!(
            root = %store.root().display(),
            files = store.known.len(),
            "feature store ready"
        );
        Ok(Arc::new(store))
    }
}
