//! Place analysis tools for LLM agents

pub mod buy_house;
pub mod find_place;

pub use buy_house::{BuyHouseTool, PropertyAnalysis, analyze_property};
pub use find_place::{FindPlaceTool, filter_by_spatial_join, sort_by_distance};
