//! Shared utilities for placemap
//!
//! This crate provides common functionality used across the placemap workspace:
//! tracing setup and the application-level configuration.

pub mod config;
pub mod logging;

pub use config::{Config, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
