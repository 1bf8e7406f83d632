//! Scoped key-value persistence.
//!
//! Stores write their whole state as a single JSON string under a key scoped
//! by a [`Namespace`] (e.g. `shelfcart:cart`). Backends only move strings;
//! serialization and validation live with the stores.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Default namespace for persisted keys.
pub const DEFAULT_NAMESPACE: &str = "shelfcart";

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be mapped to a storage location.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The namespace contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid namespace {0:?}: use letters, digits, '-' or '_'")]
    InvalidNamespace(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A string key-value store.
///
/// Implementations must treat a missing key as `Ok(None)` and removal of a
/// missing key as success.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// Namespace
// =============================================================================

/// Prefix that scopes persisted keys to one storefront or session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Parse a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidNamespace`] if the input is empty or
    /// contains characters other than ASCII letters, digits, `-`, or `_`.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let valid = !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(StorageError::InvalidNamespace(s.to_owned()))
        }
    }

    /// Build the full key for `name` within this namespace.
    #[must_use]
    pub fn key(&self, name: &str) -> String {
        format!("{}:{name}", self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_owned())
    }
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Process-local storage. Contents vanish when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// Storage that keeps one JSON file per key inside a data directory.
///
/// Key `shelfcart:cart` lives at `<dir>/shelfcart.cart.json`. The directory
/// is created on first write. Writes go to a temporary file that is then
/// renamed over the target, so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a key to its file path.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let file_stem: String = key
            .chars()
            .map(|c| match c {
                ':' => '.',
                c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => c,
                _ => '_',
            })
            .collect();

        if file_stem.trim_matches('.').is_empty() {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }

        Ok(self.dir.join(format!("{file_stem}.json")))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| Self::io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| Self::io_error(&path, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(Self::io_error(&path, e)),
            _ => Ok(()),
        }
    }
}
