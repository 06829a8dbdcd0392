//! Boundaries to the external collaborators. The pipeline consumes these;
//! their internals (embedding models, ANN indices, vocabularies, storage
//! formats) live elsewhere.

mod feature_store;
mod semantic_matcher;
mod term_index;
mod term_similarity;

pub use feature_store::{IFeatureStore, IFeatureStoreOpener};
pub use semantic_matcher::{IAnnIndex, ISemanticMatcher, ITextEncoder, SearchMode};
pub use term_index::ITermRelevanceIndex;
pub use term_similarity::ITermSimilarity;
