use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A persisted value with the time it was last written.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    saved_at: DateTime<Utc>,
}

/// Local persistent key-value storage, the client-side stand-in for
/// the browser's localStorage.
///
/// Backed by a single JSON file written synchronously on every change.
/// A missing or unreadable file yields an empty store; the storage is
/// a client cache and is never allowed to fail startup.
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, StoredValue>>,
}

impl LocalStorage {
    /// Open storage backed by the given file. Missing files start empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding unparsable storage file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read storage file");
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    /// Storage that lives only in memory. Used in tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// Store a value and persist the file synchronously.
    pub fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                saved_at: Utc::now(),
            },
        );
        self.persist(&entries);
    }

    /// Remove a key and persist the file synchronously.
    pub fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }

    fn persist(&self, entries: &BTreeMap<String, StoredValue>) {
        let Some(path) = &self.path else {
            return;
        };

        let json = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize storage");
                return;
            }
        };

        if let Err(e) = std::fs::write(path, json) {
            warn!(path = %path.display(), error = %e, "failed to write storage file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let storage = LocalStorage::in_memory();
        assert_eq!(storage.get("curia.theme"), None);
    }

    #[test]
    fn test_set_and_get() {
        let storage = LocalStorage::in_memory();
        storage.set("curia.theme", "midnight");
        assert_eq!(storage.get("curia.theme").as_deref(), Some("midnight"));
    }

    #[test]
    fn test_set_overwrites() {
        let storage = LocalStorage::in_memory();
        storage.set("curia.theme", "midnight");
        storage.set("curia.theme", "morning");
        assert_eq!(storage.get("curia.theme").as_deref(), Some("morning"));
    }

    #[test]
    fn test_remove() {
        let storage = LocalStorage::in_memory();
        storage.set("curia.theme", "midnight");
        storage.remove("curia.theme");
        assert_eq!(storage.get("curia.theme"), None);
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path().join("storage.json"));
        assert_eq!(storage.get("curia.theme"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = LocalStorage::open(&path);
        storage.set("curia.theme", "midnight");
        storage.set("settings.theme", "morning");
        drop(storage);

        let storage = LocalStorage::open(&path);
        assert_eq!(storage.get("curia.theme").as_deref(), Some("midnight"));
        assert_eq!(storage.get("settings.theme").as_deref(), Some("morning"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json {").unwrap();

        let storage = LocalStorage::open(&path);
        assert_eq!(storage.get("curia.theme"), None);

        // A later write replaces the corrupt file with valid contents.
        storage.set("curia.theme", "midnight");
        let storage = LocalStorage::open(&path);
        assert_eq!(storage.get("curia.theme").as_deref(), Some("midnight"));
    }
}
