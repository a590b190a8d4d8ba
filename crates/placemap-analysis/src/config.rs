//! Configuration for place analysis tools and the dataset store

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How `findPlace` names the dataset it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FindPlaceNaming {
    /// `findPlace_{placesDatasetName}`; the same input always maps to the same name
    #[default]
    Derived,
    /// `findPlace_{placesDatasetName}_{uuid}`; every call gets a fresh name
    PerCall,
}

impl FindPlaceNaming {
    /// Parse a naming mode, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "derived" | "deterministic" => Some(Self::Derived),
            "per_call" | "percall" | "unique" => Some(Self::PerCall),
            _ => None,
        }
    }
}

/// Configuration for analysis operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Lifetime of a dataset in the store
    pub dataset_ttl: Duration,

    /// Maximum number of datasets held per store
    pub max_datasets: usize,

    /// Lifetime of an idle conversation in the conversation cache
    pub conversation_ttl: Duration,

    /// Maximum number of conversations held at once
    pub max_conversations: usize,

    /// Naming mode for `findPlace` output datasets
    pub find_place_naming: FindPlaceNaming,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset_ttl: Duration::from_secs(2 * 60 * 60),      // 2 hours
            max_datasets: 500,
            conversation_ttl: Duration::from_secs(2 * 60 * 60), // 2 hours
            max_conversations: 100,
            find_place_naming: FindPlaceNaming::Derived,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Apply overrides from the environment
    ///
    /// Reads `PLACEMAP_DATASET_TTL_SECS`, `PLACEMAP_MAX_DATASETS` and
    /// `PLACEMAP_FIND_PLACE_NAMING`.
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(value) = std::env::var("PLACEMAP_DATASET_TTL_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|e| {
                AnalysisError::ConfigError(format!("PLACEMAP_DATASET_TTL_SECS: {e}"))
            })?;
            self.dataset_ttl = Duration::from_secs(secs);
        }

        if let Ok(value) = std::env::var("PLACEMAP_MAX_DATASETS") {
            self.max_datasets = value.trim().parse::<usize>().map_err(|e| {
                AnalysisError::ConfigError(format!("PLACEMAP_MAX_DATASETS: {e}"))
            })?;
        }

        if let Ok(value) = std::env::var("PLACEMAP_FIND_PLACE_NAMING") {
            self.find_place_naming = FindPlaceNaming::parse(&value).ok_or_else(|| {
                AnalysisError::ConfigError(format!(
                    "PLACEMAP_FIND_PLACE_NAMING: unknown mode '{value}'"
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_datasets == 0 {
            return Err(AnalysisError::ConfigError(
                "max_datasets must be greater than 0".to_string(),
            ));
        }

        if self.max_conversations == 0 {
            return Err(AnalysisError::ConfigError(
                "max_conversations must be greater than 0".to_string(),
            ));
        }

        if self.dataset_ttl.is_zero() || self.conversation_ttl.is_zero() {
            return Err(AnalysisError::ConfigError(
                "TTLs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    dataset_ttl: Option<Duration>,
    max_datasets: Option<usize>,
    conversation_ttl: Option<Duration>,
    max_conversations: Option<usize>,
    find_place_naming: Option<FindPlaceNaming>,
}

impl AnalysisConfigBuilder {
    /// Set dataset TTL
    pub fn dataset_ttl(mut self, duration: Duration) -> Self {
        self.dataset_ttl = Some(duration);
        self
    }

    /// Set the per-store dataset capacity
    pub fn max_datasets(mut self, max: usize) -> Self {
        self.max_datasets = Some(max);
        self
    }

    /// Set conversation TTL
    pub fn conversation_ttl(mut self, duration: Duration) -> Self {
        self.conversation_ttl = Some(duration);
        self
    }

    /// Set the conversation capacity
    pub fn max_conversations(mut self, max: usize) -> Self {
        self.max_conversations = Some(max);
        self
    }

    /// Set the `findPlace` naming mode
    pub fn find_place_naming(mut self, naming: FindPlaceNaming) -> Self {
        self.find_place_naming = Some(naming);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            dataset_ttl: self.dataset_ttl.unwrap_or(defaults.dataset_ttl),
            max_datasets: self.max_datasets.unwrap_or(defaults.max_datasets),
            conversation_ttl: self.conversation_ttl.unwrap_or(defaults.conversation_ttl),
            max_conversations: self.max_conversations.unwrap_or(defaults.max_conversations),
            find_place_naming: self.find_place_naming.unwrap_or(defaults.find_place_naming),
        };

        config.validate()?;
        Ok(config)
    }
}
