//! Key-value persistence port
//!
//! Everything the engine persists (the flashcard deck, search history and
//! settings) is a single JSON blob stored under a named key. Stores are
//! injected into the higher-level stores at construction.

mod file_storage;
mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use file_storage::{FileStorage, Result, StorageError};
pub use memory::MemoryStorage;

/// Synchronous read/write access to named JSON blobs
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for `key`, or `None` if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key`. Durable once this returns.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; absent keys are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Read and parse the value under `key`.
///
/// Missing or unparseable content yields `T::default()`; a failing store is
/// an error, so callers about to overwrite the key never do so blind.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.read(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            log::warn!("Discarding unparseable data under {}: {}", key, e);
            Ok(T::default())
        }
    }
}

/// Like [`read_json`], but a failing store also reads as `T::default()`.
/// Only for read-only views.
pub fn read_json_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    read_json(store, key).unwrap_or_else(|e| {
        log::warn!("Failed to read {}, showing empty: {}", key, e);
        T::default()
    })
}

/// Serialize `value` and write it under `key`
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    store.write(key, &json)
}
