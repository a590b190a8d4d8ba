//! Tool for narrowing a place search to the places inside a search area
//!
//! The places come from an earlier place-search dataset. A spatial-join
//! dataset (features carrying `id` and `Count`) optionally restricts them to
//! the ones inside the area of interest, and an isochrone dataset can be
//! overlaid for the map.

use async_trait::async_trait;
use geojson::Feature;
use placemap_core::{Dataset, DatasetName, DatasetResolver, Error, Result as CoreResult};
use placemap_tools::{Tool, ToolOutput};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::{AnalysisConfig, FindPlaceNaming};
use crate::error::{AnalysisError, Result};

/// Prefix of datasets produced by this tool
pub const FIND_PLACE_PREFIX: &str = "findPlace";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindPlaceParams {
    places_dataset_name: String,
    #[serde(default)]
    spatial_filter_dataset_name: Option<String>,
    #[serde(default)]
    isochrone_dataset_name: Option<String>,
}

/// LLM-facing result of `findPlace`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindPlaceLlmResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl FindPlaceLlmResult {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            dataset_name: None,
            summary: Some(message),
        }
    }
}

/// Tool combining a place search with a spatial filter and an isochrone overlay
pub struct FindPlaceTool {
    resolver: Arc<dyn DatasetResolver>,
    config: Arc<AnalysisConfig>,
}

impl FindPlaceTool {
    /// Create a new find place tool
    pub fn new(resolver: Arc<dyn DatasetResolver>, config: Arc<AnalysisConfig>) -> Self {
        Self { resolver, config }
    }

    fn output_name(&self, places_dataset_name: &str) -> DatasetName {
        let name = DatasetName::derived(FIND_PLACE_PREFIX, places_dataset_name);
        match self.config.find_place_naming {
            FindPlaceNaming::Derived => name,
            FindPlaceNaming::PerCall => name.with_unique_suffix(),
        }
    }

    async fn find_places(&self, params: &FindPlaceParams) -> Result<ToolOutput> {
        let places = self
            .resolver
            .resolve_dataset(&params.places_dataset_name)
            .await
            .ok_or_else(|| AnalysisError::DatasetNotFound {
                role: "places".to_string(),
                dataset: params.places_dataset_name.clone(),
            })?;

        let mut features = match &params.spatial_filter_dataset_name {
            Some(filter_name) => match self.resolver.resolve_dataset(filter_name).await {
                Some(filter) if !filter.is_empty() => filter_by_spatial_join(places, &filter),
                Some(_) => {
                    debug!(dataset = %filter_name, "Spatial filter dataset is empty, keeping all places");
                    places
                }
                None => {
                    warn!(dataset = %filter_name, "Spatial filter dataset not found, keeping all places");
                    places
                }
            },
            None => places,
        };
        let place_count = features.len();

        if let Some(isochrone_name) = &params.isochrone_dataset_name {
            match self.resolver.resolve_dataset(isochrone_name).await {
                Some(isochrone) => features.extend(isochrone),
                None => warn!(dataset = %isochrone_name, "Isochrone dataset not found, skipping overlay"),
            }
        }

        let dataset_name = self.output_name(&params.places_dataset_name);
        debug!(dataset = %dataset_name, places = place_count, features = features.len(), "Built findPlace dataset");

        let mut additional = Map::new();
        additional.insert("datasetName".to_string(), json!(dataset_name));
        additional.insert(
            dataset_name.to_string(),
            serde_json::to_value(Dataset::from_features(features))?,
        );

        let llm_result = FindPlaceLlmResult {
            success: true,
            dataset_name: Some(dataset_name.into_string()),
            summary: Some(format!(
                "Here are {place_count} places that are within the search area"
            )),
        };

        Ok(ToolOutput::new(serde_json::to_value(llm_result)?)
            .with_additional_data(Value::Object(additional)))
    }
}

/// Keep the places whose `id` appears on a spatial-join feature with `Count > 0`
///
/// The kept places are sorted ascending by distance (see [`sort_by_distance`]).
pub fn filter_by_spatial_join(places: Vec<Feature>, filter: &[Feature]) -> Vec<Feature> {
    let ids: HashSet<String> = filter
        .iter()
        .filter(|feature| has_positive_count(feature))
        .filter_map(|feature| feature.property("id").and_then(id_key))
        .collect();

    let mut kept: Vec<Feature> = places
        .into_iter()
        .filter(|place| {
            place
                .property("id")
                .and_then(id_key)
                .is_some_and(|id| ids.contains(&id))
        })
        .collect();

    sort_by_distance(&mut kept);
    kept
}

/// Stable ascending sort by the `distance` property
///
/// Missing or non-numeric distances sort last, keeping their relative order.
pub fn sort_by_distance(places: &mut [Feature]) {
    places.sort_by(|a, b| distance_of(a).total_cmp(&distance_of(b)));
}

fn distance_of(place: &Feature) -> f64 {
    place
        .property("distance")
        .and_then(as_number)
        .filter(|d| !d.is_nan())
        .unwrap_or(f64::INFINITY)
}

fn has_positive_count(feature: &Feature) -> bool {
    feature
        .property("Count")
        .and_then(as_number)
        .is_some_and(|count| count > 0.0)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// Ids compare by JSON identity, so the string "1" and the number 1 differ.
fn id_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Tool for FindPlaceTool {
    async fn execute(&self, params: Value) -> CoreResult<ToolOutput> {
        let params: FindPlaceParams = serde_json::from_value(params)
            .map_err(|e| Error::InvalidParameters(e.to_string()))?;

        debug!(?params, "findPlace args");

        match self.find_places(&params).await {
            Ok(output) => Ok(output),
            Err(e) => {
                error!(error = %e, "Error finding places");
                let message = match e {
                    AnalysisError::DatasetNotFound { .. } => e.to_string(),
                    other => format!("Error finding places: {other}"),
                };
                Ok(ToolOutput::new(serde_json::to_value(
                    FindPlaceLlmResult::failure(message),
                )?))
            }
        }
    }

    fn name(&self) -> &str {
        "findPlace"
    }

    fn description(&self) -> &str {
        "Find places using the placeSearch tool and the spatialJoin tool. \
         The placeSearch dataset provides the candidate places; the spatialJoin dataset \
         keeps only the places within the search area. An isochrone dataset can be \
         overlaid on the result. Returns the name of a new dataset with the places."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "placesDatasetName": {
                    "type": "string",
                    "description": "The name of the dataset with searched places by placeSearch tool"
                },
                "spatialFilterDatasetName": {
                    "type": "string",
                    "description": "The name of the dataset from related spatial filter tool"
                },
                "isochroneDatasetName": {
                    "type": "string",
                    "description": "The name of the dataset from isochrone tool if called"
                }
            },
            "required": ["placesDatasetName"]
        })
    }
}
