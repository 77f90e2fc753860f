//! Client-side persisted identity.
//!
//! A small key-value store (one file per key on disk, or a map in memory)
//! holds the serialized current user under `config::SESSION_KEY`. Reads are
//! forgiving: a missing, unreadable or malformed value is "no session".

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config;
use crate::models::User;

#[derive(Debug, thiserror::Error)]
pub enum IdentityStoreError {
    #[error("Identity storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Identity serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Identity storage lock poisoned")]
    LockPoisoned,
}

/// String key-value storage with the semantics of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), IdentityStoreError>;
    fn remove(&self, key: &str);
}

/// One `<key>.json` file per key inside a directory.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the application data directory.
    pub fn in_app_data() -> Self {
        Self::new(config::app_data_dir())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), IdentityStoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %path.display(), "Failed to remove stored value");
            }
        }
    }
}

/// In-process store, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), IdentityStoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| IdentityStoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

/// Typed view over the session key.
pub struct IdentityStore {
    backend: Box<dyn KeyValueStore>,
}

impl IdentityStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryKeyValueStore::new()))
    }

    /// Persist the sanitized identity.
    pub fn save(&self, user: &User) -> Result<(), IdentityStoreError> {
        let json = serde_json::to_string(user)?;
        self.backend.set(config::SESSION_KEY, &json)
    }

    /// Read the persisted identity. Malformed values are treated as absent.
    pub fn load(&self) -> Option<User> {
        let raw = self.backend.get(config::SESSION_KEY)?;
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed persisted identity");
                None
            }
        }
    }

    pub fn clear(&self) {
        self.backend.remove(config::SESSION_KEY);
    }

    /// Raw access for callers that need to seed or inspect the stored value.
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }
}
