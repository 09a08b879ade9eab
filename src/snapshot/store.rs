//! Key-value stores that hold snapshot documents.
//!
//! The engine never talks to a store directly; the session hands it encoded
//! snapshots. Stores report failures and the session decides to swallow them.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use rustc_hash::FxHashMap;

use super::SnapshotError;

/// Key-value storage for snapshot documents.
pub trait SnapshotStore: Send + Sync {
    /// Read the document under `key`, `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Store a document under `key`, replacing any previous one.
    fn set(&self, key: &str, body: &str) -> Result<(), SnapshotError>;

    /// Remove the document under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), SnapshotError>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: RwLock<FxHashMap<String, String>>,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one document.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, body: impl Into<String>) -> Self {
        let mut entries = FxHashMap::default();
        entries.insert(key.into(), body.into());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let entries = self.entries.read().map_err(|_| SnapshotError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, body: &str) -> Result<(), SnapshotError> {
        let mut entries = self.entries.write().map_err(|_| SnapshotError::LockPoisoned)?;
        entries.insert(key.to_string(), body.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SnapshotError> {
        let mut entries = self.entries.write().map_err(|_| SnapshotError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one `{key}.json` file per key in a directory.
///
/// Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    base_dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `base_dir`, creating the directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, body: &str) -> Result<(), SnapshotError> {
        let path = self.entry_path(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, body)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("saved snapshot {} to {}", key, path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SnapshotError> {
        match fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
