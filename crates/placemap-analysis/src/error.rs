//! Error types for place analysis operations

use thiserror::Error;

/// Place analysis specific errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required dataset name did not resolve
    #[error("No geometries found for {role} dataset: {dataset}")]
    DatasetNotFound {
        role: String,
        dataset: String,
    },

    /// A drive-time polygon dataset was missing or empty
    #[error("No {minutes} minutes drive distance polygon found for dataset: {dataset}")]
    DriveAreaMissing {
        minutes: u32,
        dataset: String,
    },

    /// Geometry could not be used for a spatial test
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Dataset store error
    #[error("Store error: {0}")]
    StoreError(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Convert AnalysisError to placemap_core::Error
impl From<AnalysisError> for placemap_core::Error {
    fn from(err: AnalysisError) -> Self {
        placemap_core::Error::ExecutionFailed(err.to_string())
    }
}

/// Convert placemap_core::Error to AnalysisError
impl From<placemap_core::Error> for AnalysisError {
    fn from(err: placemap_core::Error) -> Self {
        AnalysisError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::DatasetNotFound {
            role: "places".to_string(),
            dataset: "placeSearch_1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No geometries found for places dataset: placeSearch_1"
        );

        let err = AnalysisError::DriveAreaMissing {
            minutes: 5,
            dataset: "isochrone_5".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No 5 minutes drive distance polygon found for dataset: isochrone_5"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err = AnalysisError::InvalidGeometry("ring has 1 position".to_string());
        let core_err: placemap_core::Error = err.into();

        match core_err {
            placemap_core::Error::ExecutionFailed(msg) => {
                assert!(msg.contains("Invalid geometry"));
            },
            _ => panic!("Expected ExecutionFailed variant"),
        }
    }
}
