//! Persistence stores: in-memory and a JSON file on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use flashdrill_core::error::StoreError;
use flashdrill_core::traits::{PersistenceStore, StoredValue};

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored key.
    pub fn snapshot(&self) -> BTreeMap<String, StoredValue> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// A flat JSON object on disk, rewritten in full on every `set`.
///
/// Reads are served from the copy loaded at `open`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, StoredValue>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "opened profile store");

        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, values: &BTreeMap<String, StoredValue>) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(values).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PersistenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        self.write(&values)
    }
}
