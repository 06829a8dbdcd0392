//! DocumentScoreMap: document id → relevance score, kept in rank order.
//!
//! Scores are only comparable within one signal. A context map holds bounded
//! cosine similarities, a focus map holds unbounded weighted sums.

use std::collections::HashMap;

use super::image_id::{IdScheme, ImageId};

/// Unique-keyed score mapping that remembers insertion order.
///
/// Rankers insert in descending score order, so iteration yields the
/// ranking. Consumers that only need the key set must not rely on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentScoreMap {
    entries: Vec<(ImageId, f64)>,
    index: HashMap<ImageId, usize>,
}

impl DocumentScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(id, score)` pairs in rank order. A repeated id keeps its
    /// first (best-ranked) score.
    pub fn from_ranked<I>(ranked: I) -> Self
    where
        I: IntoIterator<Item = (ImageId, f64)>,
    {
        let mut map = Self::new();
        for (id, score) in ranked {
            map.push(id, score);
        }
        map
    }

    /// Append an entry. Returns `false` (and changes nothing) if the id is
    /// already present.
    pub fn push(&mut self, id: ImageId, score: f64) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, score));
        true
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.index.get(id).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ImageId> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// `(id, score)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ImageId, f64)> {
        self.entries.iter().map(|(id, s)| (id, *s))
    }

    pub fn into_entries(self) -> Vec<(ImageId, f64)> {
        self.entries
    }

    /// A new map with every key canonicalized by `scheme`. Keys that collapse
    /// onto the same canonical id keep the first entry.
    pub fn normalized(&self, scheme: &IdScheme) -> Self {
        Self::from_ranked(
            self.entries
                .iter()
                .map(|(id, score)| (scheme.normalize(id.as_str()), *score)),
        )
    }
}

impl FromIterator<(ImageId, f64)> for DocumentScoreMap {
    fn from_iter<T: IntoIterator<Item = (ImageId, f64)>>(iter: T) -> Self {
        Self::from_ranked(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> DocumentScoreMap {
        pairs.iter().map(|(id, s)| (ImageId::from(*id), *s)).collect()
    }

    #[test]
    fn keeps_insertion_order() {
        let m = map(&[("b", 3.0), ("a", 2.0), ("c", 1.0)]);
        let ids: Vec<&str> = m.ids().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_keeps_first_score() {
        let m = map(&[("a", 3.0), ("a", 1.0)]);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("a"), Some(3.0));
    }

    #[test]
    fn normalized_collapses_padded_duplicates() {
        let m = map(&[("000123", 0.9), ("123", 0.5), ("9", 0.1)]);
        let n = m.normalized(&IdScheme::for_dataset("coco"));
        assert_eq!(n.len(), 2);
        assert_eq!(n.get("000123"), Some(0.9));
        assert!(n.contains("000009"));
        // Source map is untouched.
        assert_eq!(m.len(), 3);
    }
}
