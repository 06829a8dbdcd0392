use crate::errors::MmirsResult;
use crate::models::ImageId;

/// Precomputed term → document relevance (weighted TF-IDF) lookup.
pub trait ITermRelevanceIndex: Send + Sync {
    /// Whether the index has any postings for `term`.
    fn contains_term(&self, term: &str) -> bool;

    /// Postings for each term, in the order the terms were given. Unknown
    /// terms yield an empty list.
    fn lookup(&self, terms: &[String]) -> MmirsResult<Vec<Vec<(ImageId, f64)>>>;

    /// Terms starting with `prefix`, in ascending order.
    fn terms_with_prefix(&self, prefix: &str) -> Vec<String>;
}
