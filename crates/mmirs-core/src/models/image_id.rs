//! Image identifiers and their dataset-specific canonical form.
//!
//! COCO ids are six-digit zero-padded numbers, but some upstream sources
//! store them as integers and drop the padding. Every id is canonicalized
//! with [`IdScheme::normalize`] before it is used as a key.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{COCO_ID_WIDTH, DATASET_COCO};

/// Key of one image in a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ImageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalization rule for a dataset's identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// Ids are used as given (surrounding whitespace trimmed).
    Verbatim,
    /// Numeric ids are left-padded with zeros to `width` digits. Longer or
    /// non-numeric ids are kept as they are.
    ZeroPadded { width: usize },
}

impl IdScheme {
    /// Built-in scheme for a dataset name.
    pub fn for_dataset(dataset: &str) -> Self {
        if dataset.eq_ignore_ascii_case(DATASET_COCO) {
            IdScheme::ZeroPadded {
                width: COCO_ID_WIDTH,
            }
        } else {
            IdScheme::Verbatim
        }
    }

    /// Scheme for a dataset with an optional configured width override.
    pub fn resolve(dataset: &str, id_width: Option<usize>) -> Self {
        match id_width {
            Some(width) if width > 0 => IdScheme::ZeroPadded { width },
            _ => Self::for_dataset(dataset),
        }
    }

    /// Canonical form of one raw identifier.
    pub fn normalize(&self, raw: &str) -> ImageId {
        let trimmed = raw.trim();
        match *self {
            IdScheme::Verbatim => ImageId::from(trimmed),
            IdScheme::ZeroPadded { width } => {
                let numeric = !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit());
                if numeric && trimmed.len() < width {
                    ImageId::new(format!("{trimmed:0>width$}"))
                } else {
                    ImageId::from(trimmed)
                }
            }
        }
    }

    /// Canonicalize a sequence of ids, dropping any id whose canonical form
    /// was already seen. First-occurrence order is preserved.
    pub fn normalize_unique<I, S>(&self, raw: I) -> Vec<ImageId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        raw.into_iter()
            .map(|id| self.normalize(id.as_ref()))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coco_ids_are_zero_padded() {
        let scheme = IdScheme::for_dataset("coco");
        assert_eq!(scheme.normalize("123").as_str(), "000123");
        assert_eq!(scheme.normalize("000123").as_str(), "000123");
        assert_eq!(scheme.normalize(" 42 ").as_str(), "000042");
    }

    #[test]
    fn overlong_and_non_numeric_ids_are_kept() {
        let scheme = IdScheme::ZeroPadded { width: 6 };
        assert_eq!(scheme.normalize("1234567").as_str(), "1234567");
        assert_eq!(scheme.normalize("img_12").as_str(), "img_12");
    }

    #[test]
    fn other_datasets_are_verbatim() {
        let scheme = IdScheme::for_dataset("wicsmmir");
        assert_eq!(scheme, IdScheme::Verbatim);
        assert_eq!(scheme.normalize("123").as_str(), "123");
    }

    #[test]
    fn width_override_wins() {
        assert_eq!(
            IdScheme::resolve("flickr", Some(4)),
            IdScheme::ZeroPadded { width: 4 }
        );
        assert_eq!(IdScheme::resolve("flickr", None), IdScheme::Verbatim);
    }

    #[test]
    fn normalize_unique_collapses_equivalent_ids() {
        let scheme = IdScheme::for_dataset("coco");
        let ids = scheme.normalize_unique(["123", "000123", "7", "123"]);
        assert_eq!(ids, vec![ImageId::from("000123"), ImageId::from("000007")]);
    }
}
