//! Tool management and execution framework for placemap
//!
//! This crate provides a framework for defining and executing tools
//! that an LLM orchestrator can call, and for observing their output.

pub mod output;
pub mod registry;
pub mod tool;

pub use output::ToolOutput;
pub use registry::{ToolCompletionHook, ToolRegistry};
pub use tool::Tool;
