//! Precomputed per-image features and the subsets handed to fine selection.

use std::collections::HashMap;
use std::sync::Arc;

use super::image_id::ImageId;

/// Region features of one image: `rows` vectors of `dims` floats, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub image_id: ImageId,
    pub rows: usize,
    pub dims: usize,
    pub data: Vec<f32>,
}

impl FeatureRecord {
    pub fn new(image_id: ImageId, rows: usize, dims: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(rows * dims, data.len());
        Self {
            image_id,
            rows,
            dims,
            data,
        }
    }

    /// One region vector.
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.dims;
        self.data.get(start..start + self.dims)
    }
}

/// The features for a requested id list.
///
/// Records appear once per canonical id, in request order. Ids the store
/// does not know are listed in `missing`.
#[derive(Debug, Clone, Default)]
pub struct FeatureSubset {
    records: Vec<Arc<FeatureRecord>>,
    position: HashMap<ImageId, usize>,
    missing: Vec<ImageId>,
}

impl FeatureSubset {
    pub fn new(records: Vec<Arc<FeatureRecord>>, missing: Vec<ImageId>) -> Self {
        let position = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.image_id.clone(), i))
            .collect();
        Self {
            records,
            position,
            missing,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FeatureRecord> {
        self.position.get(id).map(|&i| self.records[i].as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ImageId> {
        self.records.iter().map(|r| &r.image_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.records.iter().map(|r| r.as_ref())
    }

    pub fn missing(&self) -> &[ImageId] {
        &self.missing
    }
}
