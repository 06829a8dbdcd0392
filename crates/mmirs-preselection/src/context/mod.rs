//! ContextRanker: semantic relevance of the whole context sentence.

mod corpus;
mod embedding_matcher;

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use mmirs_core::errors::MmirsResult;
use mmirs_core::models::DocumentScoreMap;
use mmirs_core::traits::{ISemanticMatcher, SearchMode};
use tracing::debug;

pub use corpus::SentenceEmbeddingCorpus;
pub use embedding_matcher::EmbeddingMatcher;

/// Thin wrapper over a [`ISemanticMatcher`] that fixes the output contract:
/// at most `max_candidates` entries, similarity descending.
pub struct ContextRanker {
    matcher: Arc<dyn ISemanticMatcher>,
}

impl ContextRanker {
    pub fn new(matcher: Arc<dyn ISemanticMatcher>) -> Self {
        Self { matcher }
    }

    pub fn rank(
        &self,
        context: &str,
        max_candidates: usize,
        exact: bool,
    ) -> MmirsResult<DocumentScoreMap> {
        let start = Instant::now();
        let mode = SearchMode::from_exact(exact);
        let mut hits = self.matcher.search(context, max_candidates, mode)?;

        // Stable: ties keep the matcher's order.
        hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        hits.truncate(max_candidates);

        let scores: DocumentScoreMap = hits
            .into_iter()
            .map(|(id, score)| (id, f64::from(score)))
            .collect();

        debug!(
            context,
            ?mode,
            documents = scores.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "context ranking complete"
        );
        Ok(scores)
    }
}
