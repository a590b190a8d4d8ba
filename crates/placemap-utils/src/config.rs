//! Application configuration

use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "pretty" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "placemap".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load overrides from `PLACEMAP_ENV` and `PLACEMAP_LOG_FORMAT`
    ///
    /// Production environments log JSON unless a format is set explicitly.
    /// Unknown log formats fall back to the environment's default.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("PLACEMAP_ENV").ok(),
            std::env::var("PLACEMAP_LOG_FORMAT").ok(),
        )
    }

    fn from_values(environment: Option<String>, log_format: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(environment) = environment {
            config.environment = environment;
        }
        if config.is_production() {
            config.log_format = LogFormat::Json;
        }
        if let Some(format) = log_format.as_deref().and_then(LogFormat::parse) {
            config.log_format = format;
        }
        config
    }

    /// Check if running in a production environment
    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "prod" | "production")
    }
}
