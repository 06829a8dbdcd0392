//! Focus phrase → weighted similar terms.
//!
//! The phrase is split on whitespace and the full phrase is added as one
//! more token. In-vocabulary tokens start at weight 1.0. Each token's nearest
//! vocabulary terms then overwrite or extend the mapping with their
//! similarity. The result is cut to `max_similar` terms, best first.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use mmirs_core::errors::MmirsResult;
use mmirs_core::traits::ITermSimilarity;
use tracing::debug;

/// Expands a focus phrase using the word-embedding neighbourhood.
pub struct TermExpander {
    similarity: Arc<dyn ITermSimilarity>,
    top_k_similar: usize,
    max_similar: usize,
}

impl TermExpander {
    pub fn new(similarity: Arc<dyn ITermSimilarity>, top_k_similar: usize, max_similar: usize) -> Self {
        Self {
            similarity,
            top_k_similar,
            max_similar,
        }
    }

    /// Tokens the expansion starts from: whitespace tokens, then the whole
    /// phrase, without repeats.
    pub fn focus_tokens(focus: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let phrase = focus.split_whitespace().collect::<Vec<_>>().join(" ");
        focus
            .split_whitespace()
            .map(str::to_string)
            .chain(std::iter::once(phrase))
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }

    /// `(term, weight)` pairs sorted by weight descending, ties by term.
    /// Weights lie in [0, 1]. An out-of-vocabulary focus yields whatever its
    /// neighbours are, possibly nothing.
    pub fn expand(&self, focus: &str) -> MmirsResult<Vec<(String, f32)>> {
        let tokens = Self::focus_tokens(focus);

        let mut weights: HashMap<String, f32> = tokens
            .iter()
            .filter(|t| self.similarity.in_vocabulary(t))
            .map(|t| (t.clone(), 1.0))
            .collect();

        for token in &tokens {
            for (term, sim) in self.similarity.most_similar(token, self.top_k_similar)? {
                if sim.is_finite() {
                    weights.insert(term, sim);
                }
            }
        }

        let mut expanded: Vec<(String, f32)> = weights.into_iter().collect();
        expanded.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        expanded.truncate(self.max_similar);
        for (_, w) in &mut expanded {
            *w = w.clamp(0.0, 1.0);
        }

        debug!(
            focus,
            tokens = tokens.len(),
            expanded = expanded.len(),
            "expanded focus terms"
        );
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::FakeTermSimilarity;

    fn expander(top_k: usize, max: usize) -> TermExpander {
        let sim = FakeTermSimilarity::new(["green", "building", "tower", "house", "grass"])
            .with_neighbours("green", &[("green", 1.0), ("grass", 0.7)])
            .with_neighbours("building", &[("building", 1.02), ("tower", 0.8), ("house", 0.6)]);
        TermExpander::new(Arc::new(sim), top_k, max)
    }

    #[test]
    fn tokens_include_full_phrase_once() {
        assert_eq!(
            TermExpander::focus_tokens("green  building"),
            vec!["green", "building", "green building"]
        );
        assert_eq!(TermExpander::focus_tokens("tower"), vec!["tower"]);
        assert!(TermExpander::focus_tokens("   ").is_empty());
    }

    #[test]
    fn weights_are_sorted_clamped_and_capped() {
        let terms = expander(10, 4).expand("green building").unwrap();
        assert_eq!(terms.len(), 4);
        assert!(terms.iter().all(|(_, w)| (0.0..=1.0).contains(w)));
        for pair in terms.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        assert_eq!(terms[0].0, "building");
        assert_eq!(terms[0].1, 1.0);
    }

    #[test]
    fn top_k_limits_neighbours_per_token() {
        let terms = expander(1, 50).expand("building").unwrap();
        assert_eq!(terms, vec![("building".to_string(), 1.0)]);
    }

    #[test]
    fn out_of_vocabulary_focus_is_not_an_error() {
        let terms = expander(10, 50).expand("gyroscope").unwrap();
        assert!(terms.is_empty());
    }
}
