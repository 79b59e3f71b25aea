//! Durable key/value storage backing the persisted session.
//!
//! DESIGN
//! ======
//! `KeyValueStore` plays the role browser `localStorage` plays for a web
//! client: string keys, string values, synchronous calls. Writes are batched
//! (`set_many` / `remove_many`) so the session's token and user land or
//! disappear as one record.
//!
//! `CredentialStore` is the only code that knows the `token` / `user` key
//! layout. A missing or corrupt half of the pair is reported as corrupt so the
//! session layer can wipe both keys.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::net::types::User;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-serialized user.
pub const USER_KEY: &str = "user";

/// Errors produced by persisted storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("storage value invalid: {0}")]
    Json(#[from] serde_json::Error),

    /// Only one half of the credential pair was present.
    #[error("persisted credentials incomplete: missing `{0}`")]
    Incomplete(&'static str),
}

/// Synchronous string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write all entries in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    /// Remove all keys in one step. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value, bypassing the credential layout.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_owned(), value.to_owned());
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert((*key).to_owned(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON-object file store. Every write rewrites the file through a sibling
/// temp file and a rename, so a crash leaves either the old or the new map.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), guard: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if map.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, rendered)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Corrupt files are treated as empty for writes so a bad file never
    /// blocks logout or a fresh login.
    fn read_map_for_write(&self) -> BTreeMap<String, String> {
        self.read_map().unwrap_or_else(|e| {
            tracing::warn!(error = %e, path = %self.path.display(), "discarding unreadable session file");
            BTreeMap::new()
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_map()?.remove(key))
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map_for_write();
        for (key, value) in entries {
            map.insert((*key).to_owned(), value.clone());
        }
        self.write_map(&map)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map_for_write();
        for key in keys {
            map.remove(*key);
        }
        self.write_map(&map)
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Token plus user, the unit that is persisted and held in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub token: String,
    pub user: User,
}

/// Typed view over a [`KeyValueStore`] for the session record.
#[derive(Clone)]
pub struct CredentialStore {
    inner: std::sync::Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(inner: std::sync::Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Load the persisted pair.
    ///
    /// `Ok(None)` when both keys are absent.
    ///
    /// # Errors
    ///
    /// Returns an error when exactly one key is present, the user JSON does
    /// not parse, or the store cannot be read.
    pub fn load(&self) -> Result<Option<Credentials>, StorageError> {
        let token = self.inner.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let user = self.inner.get(USER_KEY)?;
        match (token, user) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(StorageError::Incomplete(USER_KEY)),
            (None, Some(_)) => Err(StorageError::Incomplete(TOKEN_KEY)),
            (Some(token), Some(raw)) => {
                let user = serde_json::from_str(&raw)?;
                Ok(Some(Credentials { token, user }))
            }
        }
    }

    /// Read only the bearer token, as the request interceptor does.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.inner.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    /// Persist both halves of the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be serialized or the write fails.
    pub fn save(&self, credentials: &Credentials) -> Result<(), StorageError> {
        let user = serde_json::to_string(&credentials.user)?;
        self.inner
            .set_many(&[(TOKEN_KEY, credentials.token.clone()), (USER_KEY, user)])
    }

    /// Rewrite only the user half; the token must already be persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be serialized or the write fails.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let user = serde_json::to_string(user)?;
        self.inner.set_many(&[(USER_KEY, user)])
    }

    /// Remove both halves of the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.inner.remove_many(&[TOKEN_KEY, USER_KEY])
    }

    /// True when either key is present, corrupt or not.
    #[must_use]
    pub fn has_any(&self) -> bool {
        let present = |key| matches!(self.inner.get(key), Ok(Some(_)));
        present(TOKEN_KEY) || present(USER_KEY)
    }
}
