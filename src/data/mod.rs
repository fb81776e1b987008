//! Data module for downloading and caching the index file
//!
//! This module provides the network fetch and the freshness policy for the
//! locally cached `DASTCOM.IDX`.

mod cache;
mod downloader;

pub use cache::{ensure_fresh, freshness, CacheStatus, Freshness, IndexSource, StaleReason};
pub use downloader::{Fetch, HttpFetcher};
