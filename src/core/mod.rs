//! Core abstractions: data model, errors, the service seam and pure math

pub mod analytics;
pub mod cache;
pub mod error;
pub mod series;
pub mod service;

// Re-export main types for cleaner imports
pub use error::{Result, SgsError};
pub use series::{LatestValue, SeriesCode, SeriesValue, SeriesValues};
pub use service::SgsService;
