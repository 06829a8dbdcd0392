use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// How the focus and context candidate sets are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MergeOp {
    Union,
    Intersection,
}

impl MergeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeOp::Union => "union",
            MergeOp::Intersection => "intersection",
        }
    }
}

impl FromStr for MergeOp {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(MergeOp::Union),
            "intersection" | "intersect" => Ok(MergeOp::Intersection),
            _ => Err(ConfigError::UnknownMergeOp {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MergeOp {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MergeOp> for String {
    fn from(op: MergeOp) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for MergeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
