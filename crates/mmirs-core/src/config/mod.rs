//! Configuration. Every section defaults so an empty TOML document is valid.

pub mod defaults;
mod observability_config;
mod pool_config;
mod preselection_config;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use observability_config::ObservabilityConfig;
pub use pool_config::PoolSettings;
pub use preselection_config::PreselectionConfig;

use crate::constants::MAX_POOL_WORKERS;
use crate::errors::ConfigError;
use crate::models::{PoolKey, RetrieverType};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MmirsConfig {
    pub preselection: PreselectionConfig,
    /// dataset → retriever name → pool settings.
    pub feature_pools: BTreeMap<String, BTreeMap<String, PoolSettings>>,
    pub observability: ObservabilityConfig,
}

impl MmirsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: MmirsConfig = toml::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.preselection;
        for (field, value) in [
            ("preselection.max_num_relevant", p.max_num_relevant),
            ("preselection.max_num_focus_relevant", p.max_num_focus_relevant),
            ("preselection.max_num_context_relevant", p.max_num_context_relevant),
            ("preselection.max_similar", p.max_similar),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        if p.min_num_relevant > p.max_num_relevant {
            return Err(invalid(
                "preselection.min_num_relevant",
                format!(
                    "{} exceeds max_num_relevant {}",
                    p.min_num_relevant, p.max_num_relevant
                ),
            ));
        }

        for (key, settings) in self.pool_entries()? {
            if settings.num_workers == 0 || settings.num_workers > MAX_POOL_WORKERS {
                return Err(invalid(
                    format!("feature_pools.{}.{}.num_workers", key.dataset, key.retriever),
                    format!("must be within 1..={MAX_POOL_WORKERS}"),
                ));
            }
        }
        Ok(())
    }

    /// Every configured pool with its retriever name parsed into the closed
    /// [`RetrieverType`] enum.
    pub fn pool_entries(&self) -> Result<Vec<(PoolKey, &PoolSettings)>, ConfigError> {
        let mut entries = Vec::new();
        for (dataset, retrievers) in &self.feature_pools {
            for (retriever, settings) in retrievers {
                let retriever: RetrieverType = retriever.parse()?;
                entries.push((PoolKey::new(dataset.clone(), retriever), settings));
            }
        }
        Ok(entries)
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}
