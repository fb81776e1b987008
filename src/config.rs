//! Runtime configuration
//!
//! Holds the values the cache manager and lookup need: where the index lives,
//! where it comes from, and how old it may get before it is refreshed.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// HTTPS mirror of `ftp://ssd.jpl.nasa.gov/pub/xfr/DASTCOM.IDX`
pub const DEFAULT_INDEX_URL: &str = "https://ssd.jpl.nasa.gov/ftp/xfr/DASTCOM.IDX";

/// File name of the cached index
pub const INDEX_FILE_NAME: &str = "DASTCOM.IDX";

/// Maximum index age before a refresh is attempted (30 days)
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2_592_000);

/// Client timeout for the whole download; the index is tens of megabytes
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Get the default cache directory path
pub fn get_cache_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".cache").join("astname")
}

/// Name of the current user, used to keep temporary downloads apart
pub fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .ok()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Configuration for locating and refreshing the index file
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    cache_dir: PathBuf,
    index_url: String,
    max_age: Duration,
    timeout: Duration,
    user: String,
}

impl Config {
    /// Create a configuration with defaults taken from the environment
    pub fn new() -> Self {
        Self {
            cache_dir: get_cache_dir(),
            index_url: DEFAULT_INDEX_URL.to_string(),
            max_age: DEFAULT_MAX_AGE,
            timeout: DEFAULT_TIMEOUT,
            user: current_user(),
        }
    }

    /// Set a custom cache directory
    pub fn with_cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the URL the index is downloaded from
    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }

    /// Set the maximum age of the cached index
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set the HTTP client timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user name used in temporary file names
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Full path of the cached index file
    pub fn index_path(&self) -> PathBuf {
        self.cache_dir.join(INDEX_FILE_NAME)
    }

    /// Per-user scratch path a fresh download is written to before it replaces the index
    pub fn temp_path(&self) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}.part", INDEX_FILE_NAME, self.user))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir() {
        let cache_dir = get_cache_dir();
        assert!(cache_dir.to_str().unwrap().contains(".cache/astname"));
    }

    #[test]
    fn test_paths_follow_cache_dir_and_user() {
        let config = Config::new()
            .with_cache_dir("/tmp/astname-test")
            .with_user("rszakats");

        assert_eq!(
            config.index_path(),
            PathBuf::from("/tmp/astname-test/DASTCOM.IDX")
        );
        assert_eq!(
            config.temp_path(),
            PathBuf::from("/tmp/astname-test/DASTCOM.IDX.rszakats.part")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.index_url(), DEFAULT_INDEX_URL);
        assert_eq!(config.max_age().as_secs(), 30 * 24 * 60 * 60);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(!config.user().is_empty());
    }
}
