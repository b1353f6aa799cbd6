//! Blob storage for uploaded recordings.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::types::StorageKey;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
}

/// Persists recording payloads under opaque keys.
pub trait RecordingStorage: Send + Sync {
    fn save(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), StorageError>;
    /// Removing a key that does not exist is not an error.
    fn delete(&self, key: &StorageKey) -> Result<(), StorageError>;
}

/// Stores recordings as flat files inside `root`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

impl RecordingStorage for LocalStorage {
    fn save(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let target = self.path_for(key);
        let tmp = self.root.join(format!(".{}.tmp", key.as_str()));

        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("recordings"));
        let key = StorageKey::generate("webm");

        storage.save(&key, b"audio-bytes").unwrap();
        let stored = fs::read(storage.root().join(key.as_str())).unwrap();
        assert_eq!(stored, b"audio-bytes");

        storage.delete(&key).unwrap();
        assert!(!storage.root().join(key.as_str()).exists());
    }

    #[test]
    fn deleting_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let key = StorageKey::generate("mp3");

        assert!(storage.delete(&key).is_ok());
    }
}
