use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

/// Prefix applied to every durable settings key, keeping them clear of
/// unrelated data sharing the same store.
pub const STORAGE_PREFIX: &str = "dotsGame_";

/// Durable, synchronous string-keyed storage medium.
///
/// Access is assumed uncontended (single process); there are no retries and
/// no timeout semantics.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Serialize a boolean for the string store.
pub fn bool_to_store(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Deserialize a boolean from the string store. Anything other than the
/// literal `"true"` (including corrupted data) reads as `false`.
pub fn bool_from_store(value: &str) -> bool {
    value == "true"
}

/// Volatile in-memory store, used in tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: HashMap::new(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store persisting the flat key-value map as JSON.
///
/// Entries are loaded once on open; every write goes through a temp file
/// followed by a rename, so a crash mid-write leaves the previous contents
/// intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| StorageError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_str(&content).map_err(|e| StorageError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            HashMap::new()
        };
        Ok(FileStore { path, entries })
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::FileWrite {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::FileWrite {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("dotsGame_levelSetId"), None);

        store.set_item("dotsGame_levelSetId", "advanced").unwrap();
        assert_eq!(
            store.get_item("dotsGame_levelSetId").as_deref(),
            Some("advanced")
        );
    }

    #[test]
    fn test_bool_encoding_literals() {
        assert_eq!(bool_to_store(true), "true");
        assert_eq!(bool_to_store(false), "false");
        assert!(bool_from_store("true"));
        assert!(!bool_from_store("false"));
    }

    #[test]
    fn test_corrupted_bool_reads_false() {
        assert!(!bool_from_store("garbage"));
        assert!(!bool_from_store(""));
        assert!(!bool_from_store("True"));
        assert!(!bool_from_store("1"));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let mut store = FileStore::open(&path).unwrap();
            store.set_item("dotsGame_soundEffects", "false").unwrap();
            store.set_item("dotsGame_playerColor", "red").unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(
            store.get_item("dotsGame_soundEffects").as_deref(),
            Some("false")
        );
        assert_eq!(
            store.get_item("dotsGame_playerColor").as_deref(),
            Some("red")
        );
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get_item("dotsGame_soundEffects"), None);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
    }

    #[test]
    fn test_file_store_overwrites_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set_item("dotsGame_levelSetId", "default").unwrap();
        store.set_item("dotsGame_levelSetId", "advanced").unwrap();
        assert_eq!(
            store.get_item("dotsGame_levelSetId").as_deref(),
            Some("advanced")
        );
    }
}
