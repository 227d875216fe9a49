// Key-value stores backing the offline cache.
// Provides an in-memory store and a persistent JSON file store with atomic writes.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// String-keyed store used purely as a cache.
///
/// Individual `get` and `set` calls are atomic. Nothing is sequenced across calls.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local store with no persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.map).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.map).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.map).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A stored value with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// The raw text as received from the server.
    pub value: String,
    /// When the value was written.
    pub cached_at: DateTime<Utc>,
}

impl StoredEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            cached_at: Utc::now(),
        }
    }
}

/// Persistent store kept in a single JSON file.
///
/// The whole map is loaded on open and rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, StoredEntry>>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file opens empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable offline store");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened offline store");

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the value under `key` was last written.
    pub fn cached_at(&self, key: &str) -> Option<DateTime<Utc>> {
        lock(&self.entries).get(key).map(|entry| entry.cached_at)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // Hold the lock across the write so concurrent sets cannot reorder on disk.
        // Memory only changes once the file has been written.
        let mut entries = lock(&self.entries);
        let mut updated = entries.clone();
        updated.insert(key.to_string(), StoredEntry::new(value));
        write_entries(&self.path, &updated)?;
        *entries = updated;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, StoredEntry>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_entries(path: &Path, entries: &BTreeMap<String, StoredEntry>) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(entries)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
