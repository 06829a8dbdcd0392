//! FocusRanker: lexical relevance of a short focus phrase.
//!
//! expand phrase → drop terms unknown to the index → look up postings →
//! optionally scale by term weight → sum per document → top-k.

mod expansion;
mod term_table;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use mmirs_core::errors::MmirsResult;
use mmirs_core::models::{DocumentScoreMap, IdScheme, ImageId};
use mmirs_core::traits::ITermRelevanceIndex;
use tracing::debug;

pub use expansion::TermExpander;
pub use term_table::{TermRelevanceTable, TermRow};

/// Output of a focus ranking plus the terms that produced it.
#[derive(Debug, Clone, Default)]
pub struct FocusRanking {
    pub scores: DocumentScoreMap,
    /// Expanded terms that exist in the index, with their weights.
    pub similar_terms: Vec<(String, f32)>,
}

/// Ranks documents for a focus phrase by aggregated term relevance.
pub struct FocusRanker {
    expander: TermExpander,
    index: Arc<dyn ITermRelevanceIndex>,
    id_scheme: IdScheme,
}

impl FocusRanker {
    pub fn new(expander: TermExpander, index: Arc<dyn ITermRelevanceIndex>) -> Self {
        Self {
            expander,
            index,
            id_scheme: IdScheme::Verbatim,
        }
    }

    /// Canonicalize posting ids before summing, so one image spelled two
    /// ways in the index accumulates into a single score.
    pub fn with_id_scheme(mut self, id_scheme: IdScheme) -> Self {
        self.id_scheme = id_scheme;
        self
    }

    /// Top `max_candidates` documents for `focus`, best first.
    pub fn rank(
        &self,
        focus: &str,
        max_candidates: usize,
        weight_by_similarity: bool,
    ) -> MmirsResult<DocumentScoreMap> {
        Ok(self
            .rank_with_terms(focus, max_candidates, weight_by_similarity)?
            .scores)
    }

    /// Like [`rank`](Self::rank) but also returns the surviving terms.
    pub fn rank_with_terms(
        &self,
        focus: &str,
        max_candidates: usize,
        weight_by_similarity: bool,
    ) -> MmirsResult<FocusRanking> {
        let start = Instant::now();
        let similar_terms: Vec<(String, f32)> = self
            .expander
            .expand(focus)?
            .into_iter()
            .filter(|(term, _)| self.index.contains_term(term))
            .collect();

        if similar_terms.is_empty() {
            debug!(focus, "no focus term found in the relevance index");
            return Ok(FocusRanking::default());
        }

        let terms: Vec<String> = similar_terms.iter().map(|(t, _)| t.clone()).collect();
        let postings = self.index.lookup(&terms)?;

        let weights = similar_terms
            .iter()
            .map(|(_, w)| if weight_by_similarity { f64::from(*w) } else { 1.0 });
        let scores = aggregate(postings.iter().zip(weights), &self.id_scheme, max_candidates);

        debug!(
            focus,
            terms = terms.len(),
            documents = scores.len(),
            weight_by_similarity,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "focus ranking complete"
        );

        Ok(FocusRanking {
            scores,
            similar_terms,
        })
    }
}

/// Sum weighted postings per canonical document id and keep the best `k`.
///
/// Terms are visited in the given order, so per-document sums are
/// reproducible. Ties are broken by document id.
fn aggregate<'a, I>(weighted_postings: I, id_scheme: &IdScheme, k: usize) -> DocumentScoreMap
where
    I: Iterator<Item = (&'a Vec<(ImageId, f64)>, f64)>,
{
    let mut sums: HashMap<ImageId, f64> = HashMap::new();
    for (postings, weight) in weighted_postings {
        for (doc, base) in postings {
            *sums.entry(id_scheme.normalize(doc.as_str())).or_default() += base * weight;
        }
    }

    let mut ranked: Vec<(ImageId, f64)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.into_iter().take(k).collect()
}
