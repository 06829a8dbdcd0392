use crate::errors::MmirsResult;
use crate::models::ImageId;

/// Exactness of a semantic search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Index-based nearest neighbours. Fast, may miss close matches.
    Approximate,
    /// Brute force over the whole corpus.
    Exact,
}

impl SearchMode {
    pub fn from_exact(exact: bool) -> Self {
        if exact {
            SearchMode::Exact
        } else {
            SearchMode::Approximate
        }
    }
}

/// Sentence-level similarity search over a dataset's captions.
pub trait ISemanticMatcher: Send + Sync {
    /// At most `top_k` `(document, similarity)` hits for `query`.
    fn search(&self, query: &str, top_k: usize, mode: SearchMode)
        -> MmirsResult<Vec<(ImageId, f32)>>;
}

/// Sentence encoder.
pub trait ITextEncoder: Send + Sync {
    fn encode(&self, text: &str) -> MmirsResult<Vec<f32>>;

    fn dimensions(&self) -> usize;
}

/// Approximate nearest-neighbour index over unit-length corpus embeddings.
pub trait IAnnIndex: Send + Sync {
    /// `(corpus position, inner product)` for up to `top_k` neighbours.
    fn search(&self, query: &[f32], top_k: usize) -> MmirsResult<Vec<(usize, f32)>>;
}
