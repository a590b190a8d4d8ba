//! Tool registry for managing available tools

use crate::{Tool, ToolOutput};
use async_trait::async_trait;
use placemap_core::{Error, Result};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info};

/// Observer notified after every successful tool execution
///
/// The dataset store implements this to pick up the datasets a tool emits.
#[async_trait]
pub trait ToolCompletionHook: Send + Sync {
    /// Called with the tool's name and its output
    async fn on_tool_completed(&self, tool_name: &str, output: &ToolOutput);
}

/// Registry for managing tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
    hooks: RwLock<Vec<Arc<dyn ToolCompletionHook>>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        tools.insert(tool.name().to_string(), tool);
    }

    /// Add a completion hook
    pub fn add_hook(&self, hook: Arc<dyn ToolCompletionHook>) {
        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        hooks.push(hook);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned()
    }

    /// List all registered tools, sorted by name
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        let mut list: Vec<_> = tools.values().cloned().collect();
        list.sort_by(|a, b| a.name().cmp(b.name()));
        list
    }

    /// Tool definitions to send to the LLM
    ///
    /// Each entry is `{ "name", "description", "input_schema" }`.
    pub fn definitions(&self) -> Vec<Value> {
        self.list_tools()
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "input_schema": tool.input_schema(),
                })
            })
            .collect()
    }

    /// Execute a tool by name and notify the completion hooks
    pub async fn execute(&self, name: &str, params: Value) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        debug!(tool = name, "Executing tool");
        let start = Instant::now();
        let output = tool.execute(params).await?;
        info!(
            tool = name,
            success = output.success(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tool completed"
        );

        let hooks: Vec<_> = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            hook.on_tool_completed(name, &output).await;
        }

        Ok(output)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.is_empty()
    }
}
