//! Tool output envelope

use placemap_core::{Dataset, DatasetName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which tools publish the name of the dataset they produced
pub const DATASET_NAME_KEY: &str = "datasetName";

/// Result of a tool call
///
/// `llm_result` is what the model sees. `additional_data` carries payloads
/// for the client and the dataset store (datasets keyed by their name, plus
/// the name itself under `datasetName`) and never reaches the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    /// LLM-facing result; always carries a boolean `success` field
    pub llm_result: Value,
    /// Client-facing payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Value>,
}

impl ToolOutput {
    /// Create an output with only an LLM-facing result
    pub fn new(llm_result: Value) -> Self {
        Self {
            llm_result,
            additional_data: None,
        }
    }

    /// Attach client-facing data
    pub fn with_additional_data(mut self, data: Value) -> Self {
        self.additional_data = Some(data);
        self
    }

    /// Whether the tool reported success
    pub fn success(&self) -> bool {
        self.llm_result
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Name of the dataset the tool produced, if any
    pub fn dataset_name(&self) -> Option<&str> {
        self.additional_data
            .as_ref()
            .and_then(|data| data.get(DATASET_NAME_KEY))
            .and_then(Value::as_str)
    }

    /// Every dataset published in `additional_data`
    ///
    /// Entries that are not `{ "type": "geojson", "content": ... }` objects
    /// are skipped.
    pub fn datasets(&self) -> Vec<(DatasetName, Dataset)> {
        let Some(Value::Object(data)) = &self.additional_data else {
            return Vec::new();
        };

        data.iter()
            .filter(|(key, value)| key.as_str() != DATASET_NAME_KEY && value.is_object())
            .filter_map(|(key, value)| {
                serde_json::from_value::<Dataset>(value.clone())
                    .ok()
                    .map(|dataset| (DatasetName::new(key.as_str()), dataset))
            })
            .collect()
    }
}
