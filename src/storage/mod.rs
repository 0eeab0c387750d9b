//! Key-value persistence for stored overrides.
//!
//! The store only needs string values under string keys, scoped to one
//! site origin. [`FileStorage`] keeps one JSON file per key in a directory;
//! [`MemoryStorage`] is an in-process map whose handles share state.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage key of the JSON-encoded override tree.
pub const OVERRIDES_KEY: &str = "publishingTabContent";

/// Failure to access the backing storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded while writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Minimal string key-value store.
pub trait KeyValueStorage {
    /// Read the value under `key`, `Ok(None)` if it was never set.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    /// Returns an error if the value could not be written; the previous
    /// value must then be left intact.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
