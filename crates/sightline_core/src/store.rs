//! Key-value stores for persisted overlay state
//!
//! Overlays that the user drags around remember their manual offset between
//! sessions. The host supplies the actual persistence; Sightline only needs a
//! string-keyed store of small JSON values.
//!
//! Values are kept as raw [`serde_json::Value`] so that whatever a previous
//! session (or another tool) wrote can be read back and rejected gracefully
//! when it has the wrong shape.
//!
//! # Example
//!
//! ```rust
//! use sightline_core::store::{KeyValueStore, MemoryStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.set("sightline.overlay.title", json!([12.0, -4.0]));
//! assert_eq!(store.get("sightline.overlay.title"), Some(json!([12.0, -4.0])));
//! ```

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SightlineError};

/// A persistent string-keyed store
///
/// Writes are fire-and-forget: implementations that can fail report the
/// failure through logging, never to the caller.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: Value);

    /// Remove the value stored under `key`
    fn remove(&self, key: &str);
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// In-process store, lost when dropped
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<FxHashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }

    /// Get all keys in the store
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// Store persisted as a single JSON object on disk
///
/// Every `set`/`remove` writes the whole file back; last write wins.
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. A file that exists but cannot be read
    /// or does not contain a JSON object is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|e| SightlineError::io(&path, e))?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&content)? {
                    Value::Object(map) => map,
                    _ => return Err(SightlineError::InvalidStoreFormat(path)),
                }
            }
        } else {
            Map::new()
        };

        tracing::debug!("Opened store {} with {} entries", path.display(), values.len());

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents to disk
    pub fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&*self.values.read())?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SightlineError::io(parent, e))?;
            }
        }

        fs::write(&self.path, content).map_err(|e| SightlineError::io(&self.path, e))
    }

    fn write_through(&self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to persist store {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
        self.write_through();
    }

    fn remove(&self, key: &str) {
        let removed = self.values.write().remove(key).is_some();
        if removed {
            self.write_through();
        }
    }
}
