use crate::errors::MmirsResult;

/// Word-embedding neighbourhood over the reference vocabulary.
pub trait ITermSimilarity: Send + Sync {
    /// Whether `term` is part of the reference vocabulary.
    fn in_vocabulary(&self, term: &str) -> bool;

    /// The `top_k` vocabulary terms most similar to `term`, best first, with
    /// similarity in [0, 1]. Out-of-vocabulary input may return an empty list.
    fn most_similar(&self, term: &str, top_k: usize) -> MmirsResult<Vec<(String, f32)>>;
}
