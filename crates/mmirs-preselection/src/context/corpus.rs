//! Sentence-embedding corpus: one caption embedding per image.

use std::path::Path;

use mmirs_core::errors::{MmirsResult, RetrievalError};
use mmirs_core::models::ImageId;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
struct RawCorpus {
    corpus_ids: Vec<ImageId>,
    embeddings: Vec<Vec<f32>>,
    #[serde(rename = "type")]
    kind: String,
    model: String,
    dataset: String,
}

/// Validated caption embeddings of one dataset.
#[derive(Debug, Clone)]
pub struct SentenceEmbeddingCorpus {
    corpus_ids: Vec<ImageId>,
    embeddings: Vec<Vec<f32>>,
    norms: Vec<f32>,
    dims: usize,
    pub kind: String,
    pub model: String,
    pub dataset: String,
}

impl SentenceEmbeddingCorpus {
    /// Validate and index a corpus. Every embedding must have the same
    /// non-zero dimensionality and pair with exactly one id.
    pub fn new(
        corpus_ids: Vec<ImageId>,
        embeddings: Vec<Vec<f32>>,
        kind: impl Into<String>,
        model: impl Into<String>,
        dataset: impl Into<String>,
    ) -> MmirsResult<Self> {
        if corpus_ids.len() != embeddings.len() {
            return Err(invalid(format!(
                "{} corpus ids but {} embeddings",
                corpus_ids.len(),
                embeddings.len()
            )));
        }
        let dims = embeddings.first().map(Vec::len).unwrap_or(0);
        if dims == 0 && !embeddings.is_empty() {
            return Err(invalid("embeddings have zero dimensions"));
        }
        if let Some(pos) = embeddings.iter().position(|e| e.len() != dims) {
            return Err(invalid(format!(
                "embedding {pos} has {} dimensions, expected {dims}",
                embeddings[pos].len()
            )));
        }

        let norms = embeddings
            .iter()
            .map(|e| e.iter().map(|x| x * x).sum::<f32>().sqrt())
            .collect();

        Ok(Self {
            corpus_ids,
            embeddings,
            norms,
            dims,
            kind: kind.into(),
            model: model.into(),
            dataset: dataset.into(),
        })
    }

    /// Parse the JSON corpus structure (`corpus_ids`, `embeddings`, `type`,
    /// `model`, `dataset`).
    pub fn from_json(json: &str) -> MmirsResult<Self> {
        let raw: RawCorpus = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        Self::new(raw.corpus_ids, raw.embeddings, raw.kind, raw.model, raw.dataset)
    }

    pub fn load(path: &Path) -> MmirsResult<Self> {
        info!(path = %path.display(), "loading sentence embedding corpus");
        let json = std::fs::read_to_string(path)?;
        let corpus = Self::from_json(&json)?;
        info!(
            kind = %corpus.kind,
            model = %corpus.model,
            dataset = %corpus.dataset,
            size = corpus.len(),
            "loaded sentence embeddings"
        );
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.corpus_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus_ids.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn id_at(&self, pos: usize) -> Option<&ImageId> {
        self.corpus_ids.get(pos)
    }

    pub fn embedding(&self, pos: usize) -> Option<&[f32]> {
        self.embeddings.get(pos).map(Vec::as_slice)
    }

    pub(crate) fn norm(&self, pos: usize) -> f32 {
        self.norms[pos]
    }
}

fn invalid(reason: impl Into<String>) -> mmirs_core::MmirsError {
    RetrievalError::InvalidCorpus {
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_corpus() {
        let json = r#"{"corpus_ids":["1","2"],"embeddings":[[1.0,0.0],[0.0,2.0]],
            "type":"symmetric","model":"all-MiniLM","dataset":"coco"}"#;
        let corpus = SentenceEmbeddingCorpus::from_json(json).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.dims(), 2);
        assert_eq!(corpus.norm(1), 2.0);
        assert_eq!(corpus.id_at(0).unwrap().as_str(), "1");
    }

    #[test]
    fn missing_key_is_invalid_corpus() {
        let json = r#"{"corpus_ids":[],"embeddings":[],"model":"m","dataset":"d"}"#;
        let err = SentenceEmbeddingCorpus::from_json(json).unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = SentenceEmbeddingCorpus::new(
            vec!["1".into()],
            vec![vec![1.0], vec![2.0]],
            "symmetric",
            "m",
            "d",
        )
        .unwrap_err();
        assert!(err.to_string().contains("1 corpus ids but 2 embeddings"));
    }

    #[test]
    fn ragged_dimensions_are_rejected() {
        let err = SentenceEmbeddingCorpus::new(
            vec!["1".into(), "2".into()],
            vec![vec![1.0, 0.0], vec![2.0]],
            "symmetric",
            "m",
            "d",
        )
        .unwrap_err();
        assert!(err.to_string().contains("embedding 1"));
    }
}
