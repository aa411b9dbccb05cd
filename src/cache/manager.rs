//! Cache manager for persisting roster pages to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files with
//! the time they were written. Entries older than the manager's TTL are treated
//! as absent on read but left on disk until they are overwritten.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default time-to-live for cache entries in days
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Errors that can occur when writing a cache entry
#[derive(Debug, Error)]
pub enum CacheError {
    /// Creating the directory or writing the file failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The payload could not be serialized
    #[error("Cache serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Wrapper struct for cached data stored on disk
///
/// The payload's fields are flattened next to the write timestamp, so a
/// roster is stored as `{"data": {...}, "teamName": "...", "timestamp": ...}`.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    #[serde(flatten)]
    data: T,
    /// When the data was cached, in epoch milliseconds
    timestamp: i64,
}

/// Result of reading a fresh entry from the cache
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
}

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/rosterboard/` on Linux). Every entry carries its write time and is
/// only returned while it is younger than the configured TTL.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
    /// Maximum age of an entry that is still served
    ttl: Duration,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "rosterboard")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }

    /// Replaces the time-to-live applied on reads
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Directory where cache files are stored
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Time-to-live applied on reads
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the path to a cache file for the given key
    ///
    /// Bytes outside `[A-Za-z0-9_-]` are written as `%XX`, so distinct keys
    /// never share a file.
    fn cache_path(&self, key: &str) -> PathBuf {
        let mut file_stem = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                file_stem.push(char::from(byte));
            } else {
                file_stem.push_str(&format!("%{:02X}", byte));
            }
        }
        self.cache_dir.join(format!("{}.json", file_stem))
    }

    /// Writes data to the cache, stamped with the current time
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        self.write_at(key, data, Utc::now())
    }

    /// Writes data to the cache as if it had been written at `now`
    pub fn write_at<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)?;

        let entry = CacheEntry {
            data,
            timestamp: now.timestamp_millis(),
        };
        let json = serde_json::to_string(&entry)?;

        fs::write(self.cache_path(key), json)?;
        Ok(())
    }

    /// Reads a fresh entry from the cache
    ///
    /// Returns `None` if the entry doesn't exist, cannot be parsed, or is at
    /// least `ttl` old. Nothing is deleted.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        self.read_at(key, Utc::now())
    }

    /// Reads a fresh entry from the cache as seen at `now`
    pub fn read_at<T: DeserializeOwned>(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Option<CachedData<T>> {
        let content = fs::read_to_string(self.cache_path(key)).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;
        let cached_at = DateTime::from_timestamp_millis(entry.timestamp)?;

        if now - cached_at >= self.ttl {
            return None;
        }

        Some(CachedData {
            data: entry.data,
            cached_at,
        })
    }
}
