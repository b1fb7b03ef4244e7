//! Persistence media for the serialized tree.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Failure of the persistence medium.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage key '{0}' is not a valid file name")]
    InvalidKey(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// A key-value store holding one blob per key.
pub trait Storage: Send {
    /// Read the blob under `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob under `key`. Returns once the write is durable.
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError>;
}

/// Process-local storage.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the VFS wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, as if a previous session had saved it.
    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut blobs) = storage.blobs.lock() {
            blobs.insert(key.to_string(), blob.into());
        }
        storage
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let blobs = self.blobs.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        let mut blobs = self.blobs.lock().map_err(|_| StorageError::Poisoned)?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// One JSON file per key under a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut file = std::fs::File::create(&tmp).map_err(io_err(&tmp))?;
            file.write_all(blob.as_bytes()).map_err(io_err(&tmp))?;
            file.sync_all().map_err(io_err(&tmp))?;
        }
        std::fs::rename(&tmp, &path).map_err(io_err(&path))?;
        tracing::debug!(path = %path.display(), bytes = blob.len(), "saved tree");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clones_share_blobs() {
        let mut storage = MemoryStorage::new();
        let observer = storage.clone();
        storage.save("k", "v").unwrap();
        assert_eq!(observer.load("k").unwrap().as_deref(), Some("v"));
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.load("tree").unwrap(), None);
        storage.save("tree", "{}").unwrap();
        storage.save("tree", r#"{"a":{}}"#).unwrap();
        assert_eq!(storage.load("tree").unwrap().as_deref(), Some(r#"{"a":{}}"#));

        let leftovers: Vec<_> = std::fs::read_dir(storage.dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.save("../escape", "{}"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
