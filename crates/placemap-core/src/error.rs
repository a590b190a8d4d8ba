//! Error types for placemap-core

use thiserror::Error;

/// Result type alias for placemap-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by tools and the registry
#[derive(Error, Debug)]
pub enum Error {
    /// No tool registered under the requested name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool arguments did not match the tool's input schema
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
