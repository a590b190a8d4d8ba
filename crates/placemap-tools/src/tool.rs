//! Tool trait definition

use crate::ToolOutput;
use async_trait::async_trait;
use placemap_core::Result;
use serde_json::Value;

/// Trait for tools that an orchestrator can execute
///
/// Tools are functions that LLM agents can call to work with geospatial
/// datasets. Each tool must provide a name, description, and JSON schema for
/// its input.
///
/// Domain failures (a dataset that does not resolve, bad geometry) are
/// reported inside the returned [`ToolOutput`] with `success: false`. An
/// `Err` is reserved for calls that never reached the tool's logic, such as
/// arguments that do not match the schema.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    async fn execute(&self, params: Value) -> Result<ToolOutput>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the LLM understand when to use this tool
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// # Example
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "placesDatasetName": { "type": "string" }
    ///     },
    ///     "required": ["placesDatasetName"]
    /// });
    /// ```
    fn input_schema(&self) -> Value;
}
