//! In-memory weighted TF-IDF table implementing [`ITermRelevanceIndex`].

use std::collections::BTreeMap;
use std::path::Path;

use mmirs_core::errors::MmirsResult;
use mmirs_core::models::ImageId;
use mmirs_core::traits::ITermRelevanceIndex;
use serde::Deserialize;
use tracing::info;

/// One `(term, doc, wtf_idf)` row as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct TermRow {
    pub term: String,
    pub doc: String,
    pub wtf_idf: f64,
}

/// Term-ordered postings, so exact and prefix lookups are both cheap.
#[derive(Debug, Clone, Default)]
pub struct TermRelevanceTable {
    postings: BTreeMap<String, BTreeMap<ImageId, f64>>,
    rows: usize,
}

impl TermRelevanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows. Repeated `(term, doc)` pairs are summed.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TermRow>,
    {
        let mut table = Self::new();
        for row in rows {
            table.insert(row.term, ImageId::from(row.doc), row.wtf_idf);
        }
        table
    }

    /// Parse a JSON array of rows.
    pub fn from_json(json: &str) -> MmirsResult<Self> {
        let rows: Vec<TermRow> = serde_json::from_str(json)?;
        Ok(Self::from_rows(rows))
    }

    /// Load a JSON array of rows from disk.
    pub fn load(path: &Path) -> MmirsResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            rows = table.rows,
            terms = table.postings.len(),
            "loaded term relevance table"
        );
        Ok(table)
    }

    pub fn insert(&mut self, term: String, doc: ImageId, score: f64) {
        let postings = self.postings.entry(term).or_default();
        if !postings.contains_key(&doc) {
            self.rows += 1;
        }
        *postings.entry(doc).or_default() += score;
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of distinct `(term, doc)` pairs.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl ITermRelevanceIndex for TermRelevanceTable {
    fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    fn lookup(&self, terms: &[String]) -> MmirsResult<Vec<Vec<(ImageId, f64)>>> {
        Ok(terms
            .iter()
            .map(|t| {
                self.postings
                    .get(t)
                    .map(|p| p.iter().map(|(d, s)| (d.clone(), *s)).collect())
                    .unwrap_or_default()
            })
            .collect())
    }

    fn terms_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.postings
            .range(prefix.to_string()..)
            .map(|(t, _)| t)
            .take_while(|t| t.starts_with(prefix))
            .cloned()
            .collect()
    }
}
