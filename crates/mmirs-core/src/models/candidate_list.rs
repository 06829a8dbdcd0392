//! CandidateList: the bounded output of preselection.

use std::collections::HashSet;

use super::image_id::ImageId;

/// Ids handed from preselection to fine-grained scoring.
///
/// Position carries no relevance meaning. When the merge had to cap the
/// list, the survivors are a uniform random sample of the merged set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    ids: Vec<ImageId>,
    truncated: bool,
}

impl CandidateList {
    pub fn new(ids: Vec<ImageId>, truncated: bool) -> Self {
        Self { ids, truncated }
    }

    pub fn ids(&self) -> &[ImageId] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<ImageId> {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether the merge exceeded the cap and sampled down.
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i.as_str() == id)
    }

    /// The ids as a set, for order-insensitive comparison.
    pub fn to_set(&self) -> HashSet<ImageId> {
        self.ids.iter().cloned().collect()
    }
}
