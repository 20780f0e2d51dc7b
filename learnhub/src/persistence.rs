//! Snapshot persistence for the application state.
//!
//! The whole state is written as one JSON record under a fixed key after
//! every dispatch, and read back once at startup. Storage failures never
//! reach the user: a bad or missing snapshot means starting from the
//! initial state, and a failed write is logged and forgotten.

use crate::types::{AppState, StateSnapshot};
use learnhub_runtime::StateObserver;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Key the snapshot is stored under
pub const DEFAULT_STORAGE_KEY: &str = "appState";

/// Errors from a snapshot storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing store failed
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The state could not be encoded or decoded
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key cannot be used by this backend
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// A lock guarding the store was poisoned
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// String key-value storage, in the manner of browser local storage
pub trait SnapshotStorage: Send + Sync {
    /// Reads the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key in a directory
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Stores files under `dir`, created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io = |source: std::io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io)?;
        // Readers never observe a partially written snapshot
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io)?;
        std::fs::rename(&tmp, &path).map_err(io)
    }
}

/// In-memory storage for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().map_or(0, |items| items.len())
    }

    /// Returns true if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the state snapshot through a [`SnapshotStorage`]
pub struct PersistedStore<B: SnapshotStorage> {
    backend: B,
    key: String,
}

impl<B: SnapshotStorage> PersistedStore<B> {
    /// Uses `backend` with the default key
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Uses `backend` with a custom key
    #[must_use]
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The storage backend
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the stored snapshot
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails or the stored value is
    /// not a valid snapshot.
    pub fn try_load(&self) -> Result<Option<StateSnapshot>, StorageError> {
        self.backend
            .get_item(&self.key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    /// Reads the stored snapshot, treating every failure as "no snapshot"
    #[must_use]
    pub fn load(&self) -> Option<StateSnapshot> {
        match self.try_load() {
            Ok(snapshot) => {
                tracing::debug!(key = %self.key, found = snapshot.is_some(), "Loaded snapshot");
                snapshot
            },
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "Ignoring unreadable snapshot");
                None
            },
        }
    }

    /// Writes `state` as the snapshot
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or writing fails.
    pub fn try_save(&self, state: &AppState) -> Result<(), StorageError> {
        let raw = serde_json::to_string(state)?;
        self.backend.set_item(&self.key, &raw)
    }

    /// Writes `state`, logging and dropping any failure
    pub fn save(&self, state: &AppState) {
        if let Err(error) = self.try_save(state) {
            tracing::warn!(key = %self.key, %error, "Failed to save snapshot");
        }
    }
}

impl<B: SnapshotStorage> StateObserver<AppState> for PersistedStore<B> {
    fn state_changed(&self, state: &AppState) {
        self.save(state);
    }
}

impl<B: SnapshotStorage> std::fmt::Debug for PersistedStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use crate::types::{User, UserId};

    fn signed_in() -> AppState {
        AppState {
            user: Some(User::new(UserId::new(1), "Demo Student", "student@learnhub.com")),
            ..AppState::default()
        }
    }

    #[test]
    fn nothing_stored_loads_none() {
        let store = PersistedStore::new(MemoryStorage::new());
        assert!(store.load().is_none());
    }

    #[test]
    fn saved_state_loads_back() {
        let store = PersistedStore::new(MemoryStorage::new());
        store.save(&signed_in());

        let mut state = AppState::default();
        store.load().unwrap().merge_into(&mut state);
        assert_eq!(state, signed_in());
    }

    #[test]
    fn corrupt_snapshot_is_ignored() {
        let backend = MemoryStorage::new();
        backend.set_item(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let store = PersistedStore::new(backend);

        assert!(matches!(store.try_load(), Err(StorageError::Serialization(_))));
        assert!(store.load().is_none());
    }

    #[test]
    fn file_storage_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("state"));
        assert_eq!(storage.get_item("appState").unwrap(), None);

        storage.set_item("appState", "{}").unwrap();
        assert_eq!(storage.get_item("appState").unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("state/appState.json").exists());
    }

    #[test]
    fn file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set_item("../escape", "{}"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn observer_saves_every_change() {
        let store = PersistedStore::with_key(MemoryStorage::new(), "custom");
        store.state_changed(&signed_in());
        assert!(store.backend().get_item("custom").unwrap().is_some());
        assert_eq!(store.backend().len(), 1);
    }
}
