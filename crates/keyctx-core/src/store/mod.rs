//! Key-value settings store shared between the keyboard and its companion app.
//!
//! Values are JSON documents. Keys are namespaced with `config().store_key`,
//! so two processes pointed at the same backing storage see the same values.

mod file;
mod memory;
mod value;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use value::StorageValue;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("corrupt store file: {0}")]
    Corrupt(serde_json::Error),
}

pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// All keys, sorted.
    fn keys(&self) -> Vec<String>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for Arc<S> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Typed access on top of the JSON values.
pub trait SettingsStoreExt: SettingsStore {
    /// Decode the value at `key`. A value of the wrong shape reads as absent.
    fn get_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_value(raw) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring undecodable store value");
                None
            }
        }
    }

    fn set_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, raw)
    }
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {}
