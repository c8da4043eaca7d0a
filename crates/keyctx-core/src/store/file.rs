use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::{SettingsStore, StoreError};

/// JSON-object file in a directory both processes can reach.
///
/// Every read goes to disk, since another process may have written the file
/// since the last access. Writes are read-modify-write followed by an atomic
/// `.tmp` + rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes writers within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store file `settings.json` inside an app-group container directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every entry, returning an empty map if the file doesn't exist.
    pub fn load(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::Corrupt),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> bool,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        if f(&mut entries) {
            self.save(&entries)?;
        }
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "store read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> Vec<String> {
        self.load()
            .map(|entries| entries.into_keys().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SettingsStoreExt;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(store.get("k").is_none());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn set_then_get_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileStore::in_dir(dir.path());
        let reader = FileStore::in_dir(dir.path());

        writer.set_value("a.b.count", &5u32).unwrap();
        writer.set_value("a.b.flag", &false).unwrap();

        assert_eq!(reader.get_value::<u32>("a.b.count"), Some(5));
        assert_eq!(reader.get_value::<bool>("a.b.flag"), Some(false));
        assert_eq!(reader.keys(), vec!["a.b.count", "a.b.flag"]);
        assert!(!dir.path().join("settings.tmp").exists());
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("group").join("prefs.json"));
        store.set_value("k", &1).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn remove_deletes_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set_value("k", &1).unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn corrupt_file_is_reported_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        fs::write(store.path(), b"{ not json").unwrap();
        assert!(store.get("k").is_none());
        let err = store.set_value("k", &1).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
