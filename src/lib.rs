//! Astname: resolve asteroid identifiers against the JPL DASTCOM index
//!
//! This crate looks up small Solar System bodies by IAU number, NAIFID, name or
//! provisional designation in `DASTCOM.IDX`, the comma-delimited index file
//! published by JPL. The index is cached locally and refreshed once it is
//! older than 30 days.

use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod data;
pub mod index;
pub mod report;

// Re-export commonly used types
pub use config::Config;
pub use data::{ensure_fresh, CacheStatus, Fetch, HttpFetcher, IndexSource, StaleReason};
pub use index::{classify, IndexFile, Query, Record};

/// Main error type for the astname library
#[derive(Debug, Error)]
pub enum AstnameError {
    /// The HTTP transport needed to fetch the index could not be set up
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("No asteroid name or number specified")]
    NoInput,

    /// A token that looks like a decimal number
    #[error("The {position}. argument ({token}) is wrong! Please see the usage below!")]
    InvalidInput { position: usize, token: String },

    #[error("Download of {url} failed: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("Index file not found: {0}")]
    IndexMissing(PathBuf),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for astname operations
pub type Result<T> = std::result::Result<T, AstnameError>;
