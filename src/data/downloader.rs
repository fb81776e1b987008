//! Downloader module for retrieving the index file
//!
//! The [`Fetch`] trait is the seam between the cache manager and the network;
//! [`HttpFetcher`] is the production implementation.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::AstnameError;
use crate::Result;

/// Something that can copy the resource at `url` into a local file
pub trait Fetch {
    /// Download `url` into `dest`, replacing any existing file there.
    ///
    /// Returns the number of bytes written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Whole-file downloads over HTTP(S) with a blocking client
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AstnameError::MissingDependency(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let fetch_error = |reason: String| AstnameError::FetchFailure {
            url: url.to_string(),
            reason,
        };

        // Create parent directories if they don't exist
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("status {}", response.status())));
        }

        if let Some(total_size) = response.content_length() {
            debug!("Server reports {} bytes for {}", total_size, url);
        }

        let mut file = BufWriter::new(File::create(dest)?);

        // Copy the response body to the file
        let mut buffer = [0; 8192];
        let mut downloaded: u64 = 0;
        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| fetch_error(format!("failed to read response: {}", e)))?;

            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])?;
            downloaded += bytes_read as u64;
        }

        file.flush()?;
        debug!("Wrote {} bytes to {}", downloaded, dest.display());

        Ok(downloaded)
    }
}
