//! Key-value storage for persisted storefront state.
//!
//! The storefront keeps a handful of JSON blobs under fixed string keys:
//!
//! ## Keys
//!
//! - `cart` - Array of cart lines
//! - `contactDraft` - The in-progress contact form, if any
//! - `contactSubmissions` - Append-only log of submitted contact forms
//!
//! ## Backends
//!
//! - [`MemoryStorage`] - Process-local map, used by tests and throwaway sessions
//! - [`FileStorage`] - One `<key>.json` file per key in a data directory
//!
//! Reads are soft: a missing, unreadable or malformed value is reported as
//! absent (see [`read_json`]). Writes surface [`StorageError`] so callers can
//! keep memory and storage consistent.

mod file;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Well-known storage keys.
pub mod keys {
    /// Cart lines.
    pub const CART: &str = "cart";
    /// Saved contact form draft.
    pub const CONTACT_DRAFT: &str = "contactDraft";
    /// Submitted contact forms.
    pub const CONTACT_SUBMISSIONS: &str = "contactSubmissions";
}

/// Errors from storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized.
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters that cannot be stored.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// In-memory map lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// String-keyed storage of serialized values.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize the JSON value stored under `key`.
///
/// Returns `None` when the key is missing, the backend fails, or the stored
/// JSON does not match `T`. Failures are logged, never propagated.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed stored value");
            None
        }
    }
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_missing_key() {
        let store = MemoryStorage::new();
        assert_eq!(read_json::<Vec<u32>>(&store, keys::CART), None);
    }

    #[test]
    fn test_read_json_malformed_value_is_absent() {
        let store = MemoryStorage::new();
        store.set(keys::CART, "{not json").unwrap();
        assert_eq!(read_json::<Vec<u32>>(&store, keys::CART), None);

        store.set(keys::CART, "{\"shape\": \"wrong\"}").unwrap();
        assert_eq!(read_json::<Vec<u32>>(&store, keys::CART), None);
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStorage::new();
        write_json(&store, keys::CONTACT_SUBMISSIONS, &vec![1, 2, 3]).unwrap();

        assert_eq!(
            store.get(keys::CONTACT_SUBMISSIONS).unwrap().as_deref(),
            Some("[1,2,3]")
        );
        assert_eq!(
            read_json::<Vec<u32>>(&store, keys::CONTACT_SUBMISSIONS),
            Some(vec![1, 2, 3])
        );
    }
}
