//! PreselectionMerger: focus ∪/∩ context → bounded CandidateList.
//!
//! Focus scores (weighted TF-IDF sums) and context scores (cosine
//! similarities) live on different scales, so the merge works on key sets
//! only. When the merged set is over the cap it is shuffled and truncated:
//! cutting by raw score would always discard the lower-scaled signal.
//!
//! An intersection with fewer than `min_candidates` ids is treated as an
//! unreliable signal and replaced by the union.

use std::collections::HashSet;
use std::sync::Mutex;

use mmirs_core::errors::{MmirsResult, RetrievalError};
use mmirs_core::models::{CandidateList, DocumentScoreMap, ImageId, MergeOp};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Merges the two ranker outputs. Owns the random source used for capping.
pub struct PreselectionMerger {
    rng: Mutex<StdRng>,
}

impl PreselectionMerger {
    /// Seeded merger for reproducible caps; `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn merge(
        &self,
        focus: &DocumentScoreMap,
        context: &DocumentScoreMap,
        merge_op: MergeOp,
        max_candidates: usize,
        min_candidates: usize,
    ) -> MmirsResult<CandidateList> {
        let mut rng = self.rng.lock().map_err(|e| RetrievalError::RngPoisoned {
            reason: e.to_string(),
        })?;
        Ok(merge_with_rng(
            focus,
            context,
            merge_op,
            max_candidates,
            min_candidates,
            &mut *rng,
        ))
    }
}

impl Default for PreselectionMerger {
    fn default() -> Self {
        Self::new(None)
    }
}

/// The merge itself, with the random source supplied by the caller.
///
/// Without capping, the output is focus ids in focus order followed by the
/// context-only ids in context order. That order is an artifact of the
/// construction, not a ranking.
pub fn merge_with_rng<R: Rng + ?Sized>(
    focus: &DocumentScoreMap,
    context: &DocumentScoreMap,
    merge_op: MergeOp,
    max_candidates: usize,
    min_candidates: usize,
    rng: &mut R,
) -> CandidateList {
    let mut merged = match merge_op {
        MergeOp::Union => union(focus, context),
        MergeOp::Intersection => {
            let intersection = intersection(focus, context);
            if intersection.len() < min_candidates {
                debug!(
                    intersection = intersection.len(),
                    min_candidates, "intersection underfilled, falling back to union"
                );
                union(focus, context)
            } else {
                intersection
            }
        }
    };
    debug!(
        %merge_op,
        focus = focus.len(),
        context = context.len(),
        merged = merged.len(),
        "merged candidate sets"
    );

    if merged.len() <= max_candidates {
        return CandidateList::new(merged, false);
    }

    merged.shuffle(rng);
    merged.truncate(max_candidates);
    debug!(max_candidates, "capped merged candidates by random sampling");
    CandidateList::new(merged, true)
}

fn union(focus: &DocumentScoreMap, context: &DocumentScoreMap) -> Vec<ImageId> {
    let mut seen: HashSet<&ImageId> = HashSet::with_capacity(focus.len() + context.len());
    focus
        .ids()
        .chain(context.ids())
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

fn intersection(focus: &DocumentScoreMap, context: &DocumentScoreMap) -> Vec<ImageId> {
    focus
        .ids()
        .filter(|id| context.contains(id.as_str()))
        .cloned()
        .collect()
}
