use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Fine-selection retriever kinds a feature pool can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RetrieverType {
    Teran,
    Uniter,
}

impl RetrieverType {
    pub const ALL: [RetrieverType; 2] = [RetrieverType::Teran, RetrieverType::Uniter];

    pub fn as_str(&self) -> &'static str {
        match self {
            RetrieverType::Teran => "teran",
            RetrieverType::Uniter => "uniter",
        }
    }
}

impl FromStr for RetrieverType {
    type Err = ConfigError;

    /// Whole-name match only. `"teran_coco"` is not a TERAN retriever.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RetrieverType::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownRetriever {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for RetrieverType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RetrieverType> for String {
    fn from(r: RetrieverType) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for RetrieverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one feature pool: (source dataset, retriever type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolKey {
    pub dataset: String,
    pub retriever: RetrieverType,
}

impl PoolKey {
    pub fn new(dataset: impl Into<String>, retriever: RetrieverType) -> Self {
        Self {
            dataset: dataset.into(),
            retriever,
        }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dataset, self.retriever)
    }
}
