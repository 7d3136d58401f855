//! Durable key/value backends the session record is persisted to.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Failure writing to or removing from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("session storage I/O error at {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The backend rejected the operation (for example a full browser quota).
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    /// The session could not be encoded.
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A string key/value store that survives restarts of the client.
///
/// Implementations must make `write` and `remove` visible to the next `read`
/// as soon as they return.
pub trait SessionStorage: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read at all.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the value could not be persisted.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    /// Returns an error if an existing value could not be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one raw record.
    #[must_use]
    pub fn with_record(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.entries().insert(key.to_string(), value.to_string());
        storage
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Store records under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<config dir>/explorer`, or `./.explorer` when no home is known.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        directories::BaseDirs::new().map_or_else(
            || PathBuf::from("./.explorer"),
            |dirs| dirs.config_dir().join("explorer"),
        )
    }

    /// Directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(&path, err)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|err| Self::io_error(&self.dir, err))?;

        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value.as_bytes()).map_err(|err| Self::io_error(&staging, err))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&staging, fs::Permissions::from_mode(0o600))
                .map_err(|err| Self::io_error(&staging, err))?;
        }
        fs::rename(&staging, &path).map_err(|err| Self::io_error(&path, err))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(&path, err)),
        }
    }
}
