//! Named dataset storage shared between tool calls

use async_trait::async_trait;
use cached::{Cached, TimedSizedCache};
use geojson::Feature;
use placemap_core::{Dataset, DatasetName, DatasetResolver};
use placemap_tools::{ToolCompletionHook, ToolOutput};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Thread-safe store of named datasets with a TTL and a capacity bound
///
/// Once the capacity is reached, the least recently used dataset is evicted.
/// Clones share the same underlying storage.
#[derive(Clone)]
pub struct DatasetStore {
    datasets: Arc<RwLock<TimedSizedCache<String, Dataset>>>,
}

impl DatasetStore {
    /// Create a new store with specified TTL and capacity
    pub fn new(ttl: Duration, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(AnalysisError::StoreError(
                "capacity must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            datasets: Arc::new(RwLock::new(TimedSizedCache::with_size_and_lifespan(
                capacity, ttl,
            ))),
        })
    }

    /// Create a store sized from the analysis config
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Self::new(config.dataset_ttl, config.max_datasets)
    }

    /// Insert a dataset
    ///
    /// Returns true when an existing dataset with the same name was replaced.
    pub async fn insert(&self, name: DatasetName, dataset: Dataset) -> bool {
        let mut datasets = self.datasets.write().await;
        datasets.cache_set(name.into_string(), dataset).is_some()
    }

    /// Get a dataset from the store
    pub async fn get(&self, name: &str) -> Option<Dataset> {
        let mut datasets = self.datasets.write().await;
        datasets.cache_get(name).cloned()
    }

    /// Get a copy of a dataset's features
    pub async fn features(&self, name: &str) -> Option<Vec<Feature>> {
        self.get(name).await.map(Dataset::into_features)
    }

    /// Register every dataset published in a tool's output
    ///
    /// Returns the number of datasets stored.
    pub async fn record_output(&self, output: &ToolOutput) -> usize {
        let datasets = output.datasets();
        let count = datasets.len();

        for (name, dataset) in datasets {
            tracing::debug!(dataset = %name, features = dataset.len(), "Registering dataset");
            if self.insert(name.clone(), dataset).await {
                tracing::debug!(dataset = %name, "Replaced existing dataset");
            }
        }

        count
    }

    /// Invalidate a specific dataset
    pub async fn invalidate(&self, name: &str) {
        let mut datasets = self.datasets.write().await;
        let _ = datasets.cache_remove(name);
    }

    /// Clear all datasets
    pub async fn clear(&self) {
        let mut datasets = self.datasets.write().await;
        datasets.cache_clear();
    }

    /// Get the number of stored datasets (expired entries included until touched)
    pub async fn len(&self) -> usize {
        let datasets = self.datasets.read().await;
        datasets.cache_size()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DatasetResolver for DatasetStore {
    async fn resolve_dataset(&self, name: &str) -> Option<Vec<Feature>> {
        let features = self.features(name).await;
        match &features {
            Some(f) => tracing::debug!(dataset = name, features = f.len(), "Dataset hit"),
            None => tracing::debug!(dataset = name, "Dataset miss"),
        }
        features
    }
}

#[async_trait]
impl ToolCompletionHook for DatasetStore {
    async fn on_tool_completed(&self, tool_name: &str, output: &ToolOutput) {
        let stored = self.record_output(output).await;
        if stored > 0 {
            tracing::info!(tool = tool_name, datasets = stored, "Stored tool output datasets");
        }
    }
}

/// Per-conversation dataset stores
///
/// Each conversation gets its own [`DatasetStore`]. Conversations expire
/// after the configured TTL without access, and the least recently used one
/// is dropped once the capacity is reached.
#[derive(Clone)]
pub struct ConversationCache {
    conversations: Arc<RwLock<TimedSizedCache<String, DatasetStore>>>,
    dataset_ttl: Duration,
    max_datasets: usize,
}

impl ConversationCache {
    /// Create a conversation cache from the analysis config
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            conversations: Arc::new(RwLock::new(
                TimedSizedCache::with_size_and_lifespan_and_refresh(
                    config.max_conversations,
                    config.conversation_ttl,
                    true,
                ),
            )),
            dataset_ttl: config.dataset_ttl,
            max_datasets: config.max_datasets,
        })
    }

    /// Get the store for a conversation, creating it on first use
    pub async fn store_for(&self, conversation_id: &str) -> Result<DatasetStore> {
        let mut conversations = self.conversations.write().await;
        if let Some(store) = conversations.cache_get(conversation_id) {
            return Ok(store.clone());
        }

        tracing::debug!(conversation = conversation_id, "Creating dataset store");
        let store = DatasetStore::new(self.dataset_ttl, self.max_datasets)?;
        let _ = conversations.cache_set(conversation_id.to_string(), store.clone());
        Ok(store)
    }

    /// Drop a conversation and its datasets
    pub async fn remove(&self, conversation_id: &str) {
        let mut conversations = self.conversations.write().await;
        let _ = conversations.cache_remove(conversation_id);
    }

    /// Get the number of live conversations
    pub async fn len(&self) -> usize {
        let conversations = self.conversations.read().await;
        conversations.cache_size()
    }

    /// Check if there are no conversations
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop all conversations
    pub async fn clear(&self) {
        let mut conversations = self.conversations.write().await;
        conversations.cache_clear();
    }
}
