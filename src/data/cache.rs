//! Local cache of the index file
//!
//! The cached copy is downloaded when missing and replaced once its
//! modification time is older than the configured maximum age. A replacement
//! only goes through when it is at least as large as the file it replaces; a
//! smaller download is taken as a sign of truncation and the old file is kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use super::downloader::Fetch;
use crate::config::{Config, DEFAULT_MAX_AGE};
use crate::Result;

/// Where the index lives and where it comes from
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSource {
    path: PathBuf,
    temp_path: PathBuf,
    url: String,
    max_age: Duration,
}

impl IndexSource {
    /// Create a source for `path`, downloaded from `url`
    pub fn new<P: AsRef<Path>>(path: P, url: impl Into<String>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".part");
        let temp_path = path.with_file_name(temp_name);

        Self {
            path,
            temp_path,
            url: url.into(),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Set the age after which the cached file is refreshed
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set the scratch file downloads are written to before replacing the index
    pub fn with_temp_path<P: AsRef<Path>>(mut self, temp_path: P) -> Self {
        self.temp_path = temp_path.as_ref().to_path_buf();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

impl From<&Config> for IndexSource {
    fn from(config: &Config) -> Self {
        IndexSource::new(config.index_path(), config.index_url())
            .with_temp_path(config.temp_path())
            .with_max_age(config.max_age())
    }
}

/// State of the cached file before any download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    Fresh(Duration),
    Stale(Duration),
}

/// Why a stale index was kept instead of replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// The download failed; carries the error message
    FetchFailed(String),
    /// The download was smaller than the file it would replace
    Undersized { old_size: u64, new_size: u64 },
}

/// Outcome of [`ensure_fresh`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// There was no cached file; it has been downloaded
    Downloaded { size: u64 },
    /// The cached file is young enough to use as is
    UpToDate { age: Duration },
    /// The cached file was stale and has been replaced
    Refreshed { old_size: u64, new_size: u64 },
    /// The cached file was stale but is still in use
    KeptStale { reason: StaleReason },
}

/// Age of a file according to its modification time. Timestamps in the future count as zero.
fn file_age(metadata: &fs::Metadata) -> io::Result<Duration> {
    let modified = metadata.modified()?;
    Ok(SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO))
}

/// Inspect the cached file without touching the network
pub fn freshness(source: &IndexSource) -> Result<Freshness> {
    let metadata = match fs::metadata(&source.path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Freshness::Missing),
        Err(e) => return Err(e.into()),
    };

    let age = file_age(&metadata)?;
    if age > source.max_age {
        Ok(Freshness::Stale(age))
    } else {
        Ok(Freshness::Fresh(age))
    }
}

/// Make sure a usable, fresh-enough copy of the index exists at `source.path()`.
///
/// At most one fetch happens per call. A failed first download is an error; a
/// failed or undersized refresh leaves the existing file in place and is
/// reported through [`CacheStatus::KeptStale`].
pub fn ensure_fresh<F: Fetch + ?Sized>(fetcher: &F, source: &IndexSource) -> Result<CacheStatus> {
    for dir in [source.path.parent(), source.temp_path.parent()]
        .into_iter()
        .flatten()
    {
        fs::create_dir_all(dir)?;
    }

    match freshness(source)? {
        Freshness::Missing => {
            info!(
                "No index file at {}, downloading {}",
                source.path.display(),
                source.url
            );
            let size = download(fetcher, source)?;
            fs::rename(&source.temp_path, &source.path)?;
            info!("Index file saved to {} ({} bytes)", source.path.display(), size);
            Ok(CacheStatus::Downloaded { size })
        }
        Freshness::Fresh(age) => {
            debug!(
                "Index file {} is {} days old, no refresh needed",
                source.path.display(),
                age.as_secs() / 86_400
            );
            Ok(CacheStatus::UpToDate { age })
        }
        Freshness::Stale(age) => {
            let metadata = fs::metadata(&source.path)?;
            if let Ok(modified) = metadata.modified() {
                let modified: DateTime<Local> = modified.into();
                info!(
                    "Index file {} last modified {} ({} days ago), refreshing",
                    source.path.display(),
                    modified.format("%Y-%m-%d %H:%M"),
                    age.as_secs() / 86_400
                );
            }
            refresh(fetcher, source, metadata.len())
        }
    }
}

/// Fetch into the temporary path, removing it again on failure
fn download<F: Fetch + ?Sized>(fetcher: &F, source: &IndexSource) -> Result<u64> {
    match fetcher.fetch(&source.url, &source.temp_path) {
        Ok(_) => Ok(fs::metadata(&source.temp_path)?.len()),
        Err(e) => {
            let _ = fs::remove_file(&source.temp_path);
            Err(e)
        }
    }
}

fn refresh<F: Fetch + ?Sized>(
    fetcher: &F,
    source: &IndexSource,
    old_size: u64,
) -> Result<CacheStatus> {
    let new_size = match download(fetcher, source) {
        Ok(size) => size,
        Err(e) => {
            warn!("Refreshing {} failed, keeping old index: {}", source.path.display(), e);
            return Ok(CacheStatus::KeptStale {
                reason: StaleReason::FetchFailed(e.to_string()),
            });
        }
    };

    if new_size < old_size {
        warn!(
            "Downloaded index is smaller than the cached one ({} < {} bytes), keeping old index",
            new_size, old_size
        );
        if let Err(e) = fs::remove_file(&source.temp_path) {
            warn!(
                "Could not remove {}: {}",
                source.temp_path.display(),
                e
            );
        }
        return Ok(CacheStatus::KeptStale {
            reason: StaleReason::Undersized { old_size, new_size },
        });
    }

    fs::rename(&source.temp_path, &source.path)?;
    info!(
        "Index file {} refreshed ({} -> {} bytes)",
        source.path.display(),
        old_size,
        new_size
    );
    Ok(CacheStatus::Refreshed { old_size, new_size })
}
