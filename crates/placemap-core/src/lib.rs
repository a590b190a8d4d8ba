//! Core abstractions for placemap
//!
//! This crate defines the types shared by every placemap crate: the named
//! GeoJSON [`Dataset`], its typed [`DatasetName`], the [`DatasetResolver`]
//! seam through which tools look datasets up, and the common error type.

pub mod dataset;
pub mod error;

pub use dataset::{Dataset, DatasetName, DatasetResolver};
pub use error::{Error, Result};
