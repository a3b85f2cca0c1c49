//! Per-video trim records and the key/value file they live in.
//!
//! Records are stored the way a browser's local storage would hold them: a
//! flat map of string keys (`yt-trim-<videoId>`) to JSON-encoded string values
//! (`{"start":10,"end":80}`).  The whole map is one JSON file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const TRIM_KEY_PREFIX: &str = "yt-trim-";

/// Minimum distance, in percentage points, between the two trim handles.
pub const MIN_TRIM_GAP: f64 = 5.0;

pub const TRIM_MIN: f64 = 0.0;
pub const TRIM_MAX: f64 = 100.0;

/// Trim window as percentages of the video duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRecord {
    #[serde(default = "default_start")]
    pub start: f64,
    #[serde(default = "default_end")]
    pub end: f64,
}

fn default_start() -> f64 {
    TRIM_MIN
}

fn default_end() -> f64 {
    TRIM_MAX
}

impl Default for TrimRecord {
    fn default() -> Self {
        Self {
            start: TRIM_MIN,
            end: TRIM_MAX,
        }
    }
}

impl TrimRecord {
    /// Decode a stored value.  Missing fields take their defaults.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// True when both bounds are in range and at least `MIN_TRIM_GAP` apart.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.start >= TRIM_MIN
            && self.end <= TRIM_MAX
            && self.end - self.start >= MIN_TRIM_GAP
    }
}

pub fn trim_key(video_id: &str) -> String {
    format!("{}{}", TRIM_KEY_PREFIX, video_id)
}

#[derive(Debug, Error)]
pub enum TrimStoreError {
    #[error("failed to write trim store {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode trim store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed string key/value store holding trim records.
///
/// `path == None` keeps everything in memory (used by tests and when the data
/// directory is unavailable).
pub struct TrimStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl TrimStore {
    /// Open the store at `path`.  A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_entries(&path);
        debug!("trim store: {} entries from {:?}", entries.len(), path);
        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<(), TrimStoreError> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    /// Stored record for `video_id`, or `{0,100}` when absent or malformed.
    /// Malformed records are logged and never surfaced.
    pub fn load(&self, video_id: &str) -> TrimRecord {
        let key = trim_key(video_id);
        let Some(raw) = self.get_item(&key) else {
            return TrimRecord::default();
        };
        match TrimRecord::parse(raw) {
            Ok(record) if record.is_valid() => record,
            Ok(record) => {
                warn!("trim store: {} out of range ({:?}), using defaults", key, record);
                TrimRecord::default()
            }
            Err(e) => {
                warn!("trim store: {} is malformed ({}), using defaults", key, e);
                TrimRecord::default()
            }
        }
    }

    pub fn save(&mut self, video_id: &str, record: TrimRecord) -> Result<(), TrimStoreError> {
        let value = serde_json::to_string(&record)?;
        self.set_item(&trim_key(video_id), value)
    }

    fn flush(&self) -> Result<(), TrimStoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_err = |source| TrimStoreError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json).map_err(write_err)?;
        Ok(())
    }

    fn load_entries(path: &Path) -> BTreeMap<String, String> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("trim store: {:?} is not a key/value map ({}), starting empty", path, e);
                BTreeMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_record_defaults() {
        let store = TrimStore::in_memory();
        assert_eq!(store.load("nope"), TrimRecord { start: 0.0, end: 100.0 });
    }

    #[test]
    fn test_corrupt_record_defaults() {
        let mut store = TrimStore::in_memory();
        store.set_item("yt-trim-abc", "{start: 10,").unwrap();
        assert_eq!(store.load("abc"), TrimRecord::default());

        store.set_item("yt-trim-abc", "null").unwrap();
        assert_eq!(store.load("abc"), TrimRecord::default());
    }

    #[test]
    fn test_partial_record_fills_missing_fields() {
        let mut store = TrimStore::in_memory();
        store.set_item("yt-trim-abc", r#"{"start":20}"#).unwrap();
        assert_eq!(store.load("abc"), TrimRecord { start: 20.0, end: 100.0 });

        store.set_item("yt-trim-abc", "{}").unwrap();
        assert_eq!(store.load("abc"), TrimRecord::default());
    }

    #[test]
    fn test_inverted_record_defaults() {
        let mut store = TrimStore::in_memory();
        store.set_item("yt-trim-abc", r#"{"start":90,"end":92}"#).unwrap();
        assert_eq!(store.load("abc"), TrimRecord::default());
    }

    #[test]
    fn test_save_writes_browser_style_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trims.json");

        let mut store = TrimStore::open(&path);
        store
            .save("abc", TrimRecord { start: 12.5, end: 80.0 })
            .unwrap();

        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["yt-trim-abc"], r#"{"start":12.5,"end":80.0}"#);

        let reopened = TrimStore::open(&path);
        assert_eq!(reopened.load("abc"), TrimRecord { start: 12.5, end: 80.0 });
        assert_eq!(reopened.load("other"), TrimRecord::default());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trims.json");
        std::fs::write(&path, "[1,2,3]").unwrap();
        let store = TrimStore::open(&path);
        assert!(store.get_item("yt-trim-abc").is_none());
    }
}
