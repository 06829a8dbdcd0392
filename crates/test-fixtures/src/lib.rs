//! In-memory collaborators and on-disk fixture writers for MMIRS tests.
//!
//! Every external boundary in `mmirs_core::traits` has a fake here, plus
//! helpers that lay out feature directories in the binary format the
//! file-backed pool reads.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mmirs_core::config::PoolSettings;
use mmirs_core::errors::MmirsResult;
use mmirs_core::models::{FeatureRecord, ImageId};
use mmirs_core::traits::{
    IAnnIndex, IFeatureStore, IFeatureStoreOpener, ISemanticMatcher, ITermRelevanceIndex,
    ITermSimilarity, ITextEncoder, SearchMode,
};
use mmirs_core::MmirsError;

// ---------------------------------------------------------------------------
// Term similarity
// ---------------------------------------------------------------------------

/// Vocabulary with hand-written neighbour lists.
#[derive(Debug, Default, Clone)]
pub struct FakeTermSimilarity {
    vocab: HashSet<String>,
    neighbours: HashMap<String, Vec<(String, f32)>>,
}

impl FakeTermSimilarity {
    pub fn new<I, S>(vocab: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocab: vocab.into_iter().map(Into::into).collect(),
            neighbours: HashMap::new(),
        }
    }

    /// Neighbours returned for `term`, best first.
    pub fn with_neighbours(mut self, term: &str, neighbours: &[(&str, f32)]) -> Self {
        self.neighbours.insert(
            term.to_string(),
            neighbours.iter().map(|(t, s)| (t.to_string(), *s)).collect(),
        );
        self
    }
}

impl ITermSimilarity for FakeTermSimilarity {
    fn in_vocabulary(&self, term: &str) -> bool {
        self.vocab.contains(term)
    }

    fn most_similar(&self, term: &str, top_k: usize) -> MmirsResult<Vec<(String, f32)>> {
        Ok(self
            .neighbours
            .get(term)
            .map(|n| n.iter().take(top_k).cloned().collect())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Term relevance index
// ---------------------------------------------------------------------------

/// Term → postings map, optionally failing every lookup.
#[derive(Debug, Default)]
pub struct FakeTermIndex {
    postings: BTreeMap<String, Vec<(ImageId, f64)>>,
    failure: Option<String>,
}

impl FakeTermIndex {
    pub fn new(rows: &[(&str, &str, f64)]) -> Self {
        let mut postings: BTreeMap<String, Vec<(ImageId, f64)>> = BTreeMap::new();
        for (term, doc, score) in rows {
            postings
                .entry(term.to_string())
                .or_default()
                .push((ImageId::from(*doc), *score));
        }
        Self {
            postings,
            failure: None,
        }
    }

    /// Knows the given terms but fails every lookup with `reason`.
    pub fn failing(terms: &[&str], reason: &str) -> Self {
        let mut index = Self::new(&terms.iter().map(|t| (*t, "0", 0.0)).collect::<Vec<_>>());
        index.failure = Some(reason.to_string());
        index
    }
}

impl ITermRelevanceIndex for FakeTermIndex {
    fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    fn lookup(&self, terms: &[String]) -> MmirsResult<Vec<Vec<(ImageId, f64)>>> {
        if let Some(reason) = &self.failure {
            return Err(MmirsError::external("term-index", reason.clone()));
        }
        Ok(terms
            .iter()
            .map(|t| self.postings.get(t).cloned().unwrap_or_default())
            .collect())
    }

    fn terms_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.postings
            .keys()
            .filter(|t| t.starts_with(prefix))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Semantic matching
// ---------------------------------------------------------------------------

/// Returns a fixed hit list (first `top_k` entries, in the given order) and
/// records the requested mode.
#[derive(Debug, Default)]
pub struct FakeSemanticMatcher {
    hits: Vec<(ImageId, f32)>,
    failure: Option<String>,
    last_mode: Mutex<Option<SearchMode>>,
    calls: AtomicUsize,
}

impl FakeSemanticMatcher {
    pub fn new(hits: &[(&str, f32)]) -> Self {
        Self {
            hits: hits.iter().map(|(id, s)| (ImageId::from(*id), *s)).collect(),
            ..Default::default()
        }
    }

    /// Hits `ids` with linearly decreasing similarity.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let n = ids.len().max(1) as f32;
        Self {
            hits: ids
                .into_iter()
                .enumerate()
                .map(|(i, id)| (ImageId::new(id), 1.0 - i as f32 / n))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Default::default()
        }
    }

    pub fn last_mode(&self) -> Option<SearchMode> {
        *self.last_mode.lock().unwrap()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISemanticMatcher for FakeSemanticMatcher {
    fn search(
        &self,
        _query: &str,
        top_k: usize,
        mode: SearchMode,
    ) -> MmirsResult<Vec<(ImageId, f32)>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_mode.lock().unwrap() = Some(mode);
        if let Some(reason) = &self.failure {
            return Err(MmirsError::external("semantic-matcher", reason.clone()));
        }
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

/// Encoder with a lookup table; unknown text encodes to the zero vector.
#[derive(Debug, Default)]
pub struct FakeTextEncoder {
    dims: usize,
    table: HashMap<String, Vec<f32>>,
}

impl FakeTextEncoder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            table: HashMap::new(),
        }
    }

    pub fn with(mut self, text: &str, embedding: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), embedding);
        self
    }
}

impl ITextEncoder for FakeTextEncoder {
    fn encode(&self, text: &str) -> MmirsResult<Vec<f32>> {
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dims]))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// ANN index returning a fixed `(position, score)` list.
#[derive(Debug, Default)]
pub struct FakeAnnIndex {
    hits: Vec<(usize, f32)>,
}

impl FakeAnnIndex {
    pub fn new(hits: Vec<(usize, f32)>) -> Self {
        Self { hits }
    }
}

impl IAnnIndex for FakeAnnIndex {
    fn search(&self, _query: &[f32], top_k: usize) -> MmirsResult<Vec<(usize, f32)>> {
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Feature storage
// ---------------------------------------------------------------------------

/// Deterministic feature values for `id`, so tests can check content.
pub fn feature_values(id: &str, rows: usize, dims: usize) -> Vec<f32> {
    let seed = id.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    (0..rows * dims)
        .map(|i| (seed % 1000) as f32 + i as f32 * 0.5)
        .collect()
}

/// Record built from [`feature_values`].
pub fn feature_record(id: &str, rows: usize, dims: usize) -> FeatureRecord {
    FeatureRecord::new(ImageId::from(id), rows, dims, feature_values(id, rows, dims))
}

/// In-memory [`IFeatureStore`] that counts fetches.
#[derive(Debug, Default)]
pub struct InMemoryFeatureStore {
    records: BTreeMap<ImageId, FeatureRecord>,
    fetch_all_calls: AtomicUsize,
    fetch_subset_calls: AtomicUsize,
}

impl InMemoryFeatureStore {
    pub fn new(records: Vec<FeatureRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.image_id.clone(), r)).collect(),
            ..Default::default()
        }
    }

    /// Store with one `rows x dims` record per id.
    pub fn with_ids(ids: &[&str], rows: usize, dims: usize) -> Self {
        Self::new(ids.iter().map(|id| feature_record(id, rows, dims)).collect())
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_subset_calls(&self) -> usize {
        self.fetch_subset_calls.load(Ordering::SeqCst)
    }
}

impl IFeatureStore for InMemoryFeatureStore {
    fn known_ids(&self) -> MmirsResult<Vec<ImageId>> {
        Ok(self.records.keys().cloned().collect())
    }

    fn fetch_all(&self) -> MmirsResult<Vec<FeatureRecord>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.values().cloned().collect())
    }

    fn fetch_subset(&self, ids: &[ImageId]) -> MmirsResult<Vec<FeatureRecord>> {
        self.fetch_subset_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }
}

/// Opener handing out in-memory stores, counting how often it ran.
/// An optional delay widens the window for first-access races.
#[derive(Debug)]
pub struct CountingStoreOpener {
    ids: Vec<String>,
    rows: usize,
    dims: usize,
    delay: Duration,
    opens: AtomicUsize,
}

impl CountingStoreOpener {
    pub fn new(ids: &[&str], rows: usize, dims: usize) -> Self {
        Self {
            ids: ids.iter().map(|s| s.to_string()).collect(),
            rows,
            dims,
            delay: Duration::ZERO,
            opens: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl IFeatureStoreOpener for CountingStoreOpener {
    fn open(&self, _settings: &PoolSettings) -> MmirsResult<Arc<dyn IFeatureStore>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        Ok(Arc::new(InMemoryFeatureStore::with_ids(&ids, self.rows, self.dims)))
    }
}

/// Write one feature file: `rows: u32 LE, dims: u32 LE, rows*dims f32 LE`.
pub fn write_feature_file(path: &Path, rows: usize, dims: usize, data: &[f32]) {
    let mut bytes = Vec::with_capacity(8 + data.len() * 4);
    bytes.extend_from_slice(&(rows as u32).to_le_bytes());
    bytes.extend_from_slice(&(dims as u32).to_le_bytes());
    for v in data {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    std::fs::write(path, bytes)
        .unwrap_or_else(|e| panic!("Failed to write feature file {}: {}", path.display(), e));
}

/// Lay out `{dir}/{prefix}{id}.bin` for every id, with [`feature_values`].
pub fn write_feature_dir(dir: &Path, prefix: &str, ids: &[&str], rows: usize, dims: usize) -> Vec<PathBuf> {
    ids.iter()
        .map(|id| {
            let path = dir.join(format!("{prefix}{id}.bin"));
            write_feature_file(&path, rows, dims, &feature_values(id, rows, dims));
            path
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_values_are_deterministic() {
        assert_eq!(feature_values("000123", 2, 3), feature_values("000123", 2, 3));
        assert_ne!(feature_values("000123", 1, 3), feature_values("000124", 1, 3));
    }

    #[test]
    fn in_memory_store_skips_unknown_ids() {
        let store = InMemoryFeatureStore::with_ids(&["a", "b"], 1, 2);
        let got = store
            .fetch_subset(&[ImageId::from("a"), ImageId::from("zzz")])
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(store.fetch_subset_calls(), 1);
    }

    #[test]
    fn fake_matcher_truncates_to_top_k() {
        let m = FakeSemanticMatcher::from_ids(["a", "b", "c"]);
        let hits = m.search("q", 2, SearchMode::Exact).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(m.calls(), 1);
    }
}
