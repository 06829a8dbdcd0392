//! # mmirs-preselection
//!
//! Cheap first stage of cross-modal retrieval: shrink the corpus to a
//! bounded candidate set.
//!
//! - [`FocusRanker`]: expands a short focus phrase into weighted similar
//!   terms and aggregates a term-document relevance index.
//! - [`ContextRanker`]: sentence-embedding similarity of the context phrase.
//! - [`PreselectionMerger`]: union/intersection of both key sets with an
//!   underfill fallback and an unbiased random cap.
//! - [`PreselectionStage`]: runs both rankers concurrently per dataset and
//!   merges their output.

pub mod context;
pub mod focus;
pub mod merge;
pub mod stage;

pub use context::{ContextRanker, EmbeddingMatcher, SentenceEmbeddingCorpus};
pub use focus::{FocusRanker, FocusRanking, TermExpander, TermRelevanceTable};
pub use merge::PreselectionMerger;
pub use stage::{DatasetRankers, PreselectionRequest, PreselectionStage};
