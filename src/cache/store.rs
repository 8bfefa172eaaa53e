//! Cache store for persisting the last ticker reading to disk
//!
//! Provides a `CacheStore` that keeps a single `{"btc_last", "btc_date"}`
//! record in a JSON file under the application's cache directory.

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::TickerSnapshot;

/// Namespace of the persisted record; also the file stem on disk
pub const CACHE_NAMESPACE: &str = "crypto_cache";

/// Persisted form of a `TickerSnapshot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Last traded price as a decimal string
    #[serde(rename = "btc_last")]
    pub last: String,
    /// When the price was recorded, in Unix seconds
    #[serde(rename = "btc_date", default)]
    pub date: i64,
}

impl From<&TickerSnapshot> for CacheRecord {
    fn from(snapshot: &TickerSnapshot) -> Self {
        Self {
            last: snapshot.last.clone(),
            date: snapshot.date,
        }
    }
}

/// Reads and writes the last known ticker
///
/// The record lives in `crypto_cache.json` inside an XDG-compliant cache
/// directory (`~/.cache/cryptomonitor/` on Linux).
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where the cache file is stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a new CacheStore using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "cryptomonitor")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheStore with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache file
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to the cache file
    fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", CACHE_NAMESPACE))
    }

    /// Overwrites the persisted record with the given snapshot
    ///
    /// The record is written to a temporary file and renamed into place, so
    /// `load` sees either the previous record or the new one.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn save(&self, snapshot: &TickerSnapshot) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let record = CacheRecord::from(snapshot);
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let path = self.cache_path();
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;

        debug!("Saved {} to {}", CACHE_NAMESPACE, path.display());
        Ok(())
    }

    /// Reads the persisted record
    ///
    /// # Returns
    /// * `Some(CacheRecord)` if a record with a positive timestamp exists
    /// * `None` if nothing was saved, the file cannot be parsed, or the
    ///   stored timestamp is zero or absent
    pub fn load(&self) -> Option<CacheRecord> {
        let content = fs::read_to_string(self.cache_path()).ok()?;
        let record: CacheRecord = serde_json::from_str(&content).ok()?;

        if record.date <= 0 {
            debug!("Ignoring {} with timestamp {}", CACHE_NAMESPACE, record.date);
            return None;
        }

        Some(record)
    }
}
