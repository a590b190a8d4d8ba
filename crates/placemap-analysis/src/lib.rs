//! Place analysis tools for map-driven LLM agents
//!
//! This crate holds the geometric core behind two agent tools:
//!
//! - `findPlace`: narrows a place search to the places inside a search area,
//!   sorted by distance, with an optional isochrone overlay
//! - `buyHouse`: buckets seven amenity categories into 5 and 10 minute drive
//!   bands around a property and summarises what is nearby
//!
//! Tools read their inputs by dataset name through a
//! [`DatasetResolver`](placemap_core::DatasetResolver) and publish their
//! result as a new named dataset. [`DatasetStore`] plays both sides: it
//! resolves names for the tools and records every dataset they publish.
//!
//! # Example
//!
//! ```rust,ignore
//! use placemap_analysis::{AnalysisConfig, DatasetStore, create_tools};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalysisConfig::default().with_env()?;
//!     let store = DatasetStore::from_config(&config)?;
//!     let registry = create_tools(store.clone(), &config);
//!
//!     let output = registry
//!         .execute("findPlace", json!({ "placesDatasetName": "placeSearch_1" }))
//!         .await?;
//!     println!("{}", output.llm_result);
//!
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod config;
pub mod error;
pub mod spatial;
pub mod store;
pub mod summary;
pub mod tools;

#[cfg(test)]
mod test_support;

use placemap_core::DatasetResolver;
use placemap_tools::{ToolCompletionHook, ToolRegistry};
use std::sync::Arc;

// Re-export main types for convenience
pub use category::{Category, DriveBand};
pub use config::{AnalysisConfig, FindPlaceNaming};
pub use error::{AnalysisError, Result};
pub use spatial::{PolygonSet, is_point_in_polygons};
pub use store::{ConversationCache, DatasetStore};
pub use summary::AmenitySummary;
pub use tools::{BuyHouseTool, FindPlaceTool};

/// Register the analysis tools against `store`
///
/// The store resolves dataset names for the tools and records every dataset
/// they publish once a call completes.
pub fn create_tools(store: DatasetStore, config: &AnalysisConfig) -> ToolRegistry {
    let resolver: Arc<dyn DatasetResolver> = Arc::new(store.clone());
    let config = Arc::new(config.clone());

    let registry = ToolRegistry::new();
    registry.register(Arc::new(FindPlaceTool::new(resolver.clone(), config)));
    registry.register(Arc::new(BuyHouseTool::new(resolver)));

    let hook: Arc<dyn ToolCompletionHook> = Arc::new(store);
    registry.add_hook(hook);
    registry
}
