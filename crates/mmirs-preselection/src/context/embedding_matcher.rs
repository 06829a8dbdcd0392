//! Embedding-backed [`ISemanticMatcher`].
//!
//! The query is encoded and scaled to unit length, so inner products with
//! the ANN index equal cosine similarity. Exact mode scores every corpus
//! entry in parallel.

use std::cmp::Ordering;
use std::sync::Arc;

use mmirs_core::errors::{MmirsResult, RetrievalError};
use mmirs_core::models::ImageId;
use mmirs_core::traits::{IAnnIndex, ISemanticMatcher, ITextEncoder, SearchMode};
use rayon::prelude::*;
use tracing::{debug, warn};

use super::corpus::SentenceEmbeddingCorpus;

pub struct EmbeddingMatcher {
    encoder: Arc<dyn ITextEncoder>,
    corpus: Arc<SentenceEmbeddingCorpus>,
    ann: Option<Arc<dyn IAnnIndex>>,
}

impl EmbeddingMatcher {
    pub fn new(encoder: Arc<dyn ITextEncoder>, corpus: Arc<SentenceEmbeddingCorpus>) -> Self {
        Self {
            encoder,
            corpus,
            ann: None,
        }
    }

    /// Attach an ANN index for approximate search. Without one, approximate
    /// requests are served exactly.
    pub fn with_ann_index(mut self, ann: Arc<dyn IAnnIndex>) -> Self {
        self.ann = Some(ann);
        self
    }

    fn encode_unit(&self, query: &str) -> MmirsResult<Option<Vec<f32>>> {
        let mut q = self.encoder.encode(query)?;
        if q.len() != self.corpus.dims() {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.corpus.dims(),
                actual: q.len(),
            }
            .into());
        }
        let norm = q.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm <= f32::EPSILON || !norm.is_finite() {
            return Ok(None);
        }
        q.iter_mut().for_each(|x| *x /= norm);
        Ok(Some(q))
    }

    fn exact(&self, q: &[f32], top_k: usize) -> Vec<(usize, f32)> {
        let corpus = &self.corpus;
        let mut hits: Vec<(usize, f32)> = (0..corpus.len())
            .into_par_iter()
            .filter_map(|pos| {
                let norm = corpus.norm(pos);
                if norm <= f32::EPSILON {
                    return None;
                }
                let e = corpus.embedding(pos)?;
                let dot: f32 = e.iter().zip(q).map(|(a, b)| a * b).sum();
                Some((pos, dot / norm))
            })
            .collect();
        sort_hits(&mut hits);
        hits.truncate(top_k);
        hits
    }
}

impl ISemanticMatcher for EmbeddingMatcher {
    fn search(
        &self,
        query: &str,
        top_k: usize,
        mode: SearchMode,
    ) -> MmirsResult<Vec<(ImageId, f32)>> {
        let Some(q) = self.encode_unit(query)? else {
            warn!(query, "query embedding has zero norm; no context matches");
            return Ok(Vec::new());
        };

        let mut hits = match (mode, &self.ann) {
            (SearchMode::Approximate, Some(ann)) => ann.search(&q, top_k)?,
            (SearchMode::Approximate, None) => {
                debug!("no ANN index attached, serving approximate search exactly");
                self.exact(&q, top_k)
            }
            (SearchMode::Exact, _) => self.exact(&q, top_k),
        };
        sort_hits(&mut hits);

        Ok(hits
            .into_iter()
            .filter_map(|(pos, score)| self.corpus.id_at(pos).map(|id| (id.clone(), score)))
            .take(top_k)
            .collect())
    }
}

/// Score descending, corpus position ascending on ties.
fn sort_hits(hits: &mut [(usize, f32)]) {
    hits.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
}
