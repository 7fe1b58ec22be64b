use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{DurableStorage, StorageError};

/// Session file name in the state directory
const SESSION_FILE: &str = "session.json";

/// JSON-file backend. Every write goes straight to disk; the file is deleted
/// once the last key is removed.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or prepare) `session.json` inside `state_dir`.
    pub fn open(state_dir: &Path) -> Result<Self, StorageError> {
        let path = state_dir.join(SESSION_FILE);
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened session file");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        if self.entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("token", "abc.def.ghi").unwrap();
        storage.set("pendingAuth", "admin@test.com").unwrap();
        drop(storage);

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(
            reopened.get("pendingAuth").unwrap().as_deref(),
            Some("admin@test.com")
        );
    }

    #[test]
    fn test_file_storage_writes_flat_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("pendingAuth", "employee@test.com").unwrap();

        let contents = std::fs::read_to_string(storage.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["pendingAuth"], "employee@test.com");
    }

    #[test]
    fn test_removing_last_key_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set("token", "t").unwrap();
        assert!(storage.path().exists());

        storage.remove("token").unwrap();
        assert!(!storage.path().exists());

        // Removing again is a no-op
        storage.remove("token").unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        assert!(matches!(
            FileStorage::open(dir.path()),
            Err(StorageError::Parse(_))
        ));
    }

    #[test]
    fn test_open_creates_missing_state_dir_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut storage = FileStorage::open(&nested).unwrap();
        storage.set("token", "t").unwrap();
        assert!(nested.join(SESSION_FILE).exists());
    }
}
