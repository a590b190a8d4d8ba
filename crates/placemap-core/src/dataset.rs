//! Named GeoJSON datasets
//!
//! Tools never hold references to each other's output. A tool emits a
//! [`Dataset`] under a [`DatasetName`], and a later tool asks a
//! [`DatasetResolver`] for the features behind that name.

use async_trait::async_trait;
use geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Typed identifier of a dataset
///
/// Downstream consumers key off the plain string, so the wrapper serializes
/// transparently. Names are built from a tool prefix and either a source
/// name or a fresh unique suffix.
///
/// # Example
///
/// ```
/// use placemap_core::DatasetName;
///
/// let name = DatasetName::derived("findPlace", "placeSearch_42");
/// assert_eq!(name.as_str(), "findPlace_placeSearch_42");
///
/// let a = DatasetName::unique("buyHouse");
/// let b = DatasetName::unique("buyHouse");
/// assert_ne!(a, b);
/// assert!(a.as_str().starts_with("buyHouse_"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetName(String);

impl DatasetName {
    /// Wrap an existing dataset name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name deterministically derived from a source dataset: `{prefix}_{source}`
    pub fn derived(prefix: &str, source: &str) -> Self {
        Self(format!("{prefix}_{source}"))
    }

    /// Name unique per call: `{prefix}_{uuid}`
    pub fn unique(prefix: &str) -> Self {
        Self(format!("{prefix}_{}", Uuid::new_v4().simple()))
    }

    /// Append a fresh unique suffix to this name
    pub fn with_unique_suffix(self) -> Self {
        Self(format!("{}_{}", self.0, Uuid::new_v4().simple()))
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the plain string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DatasetName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DatasetName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A typed dataset container
///
/// Serialized as `{ "type": "geojson", "content": <FeatureCollection> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum Dataset {
    /// A GeoJSON feature collection
    #[serde(rename = "geojson")]
    GeoJson(FeatureCollection),
}

impl Dataset {
    /// Build a GeoJSON dataset from a list of features
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self::GeoJson(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    /// Features held by the dataset
    pub fn features(&self) -> &[Feature] {
        match self {
            Self::GeoJson(collection) => &collection.features,
        }
    }

    /// Consume the dataset and return its features
    pub fn into_features(self) -> Vec<Feature> {
        match self {
            Self::GeoJson(collection) => collection.features,
        }
    }

    /// Number of features in the dataset
    pub fn len(&self) -> usize {
        self.features().len()
    }

    /// Check if the dataset has no features
    pub fn is_empty(&self) -> bool {
        self.features().is_empty()
    }
}

/// Lookup capability for named datasets
///
/// Implementations return a copy of the dataset's features, or `None` when
/// the name is unknown. A missing name is never an error.
#[async_trait]
pub trait DatasetResolver: Send + Sync {
    /// Resolve a dataset name into its features
    async fn resolve_dataset(&self, name: &str) -> Option<Vec<Feature>>;
}
