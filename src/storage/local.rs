//! File-backed key-value store
//!
//! Every value is a string, and the whole map lives in one JSON file that is
//! rewritten atomically on each change. A missing or unreadable file behaves
//! like an empty store.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::StorageError;

pub const STORE_FILE_NAME: &str = "local_storage.json";

/// String-keyed local storage persisted under a data directory
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store in `data_dir`, degrading to an empty map on read failure
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().join(STORE_FILE_NAME);
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            entries,
        }
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    /// Decode a JSON-encoded value; absent or malformed values read as `None`
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed value under {}: {}", key, e);
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, text)
    }

    fn flush(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let text = serde_json::to_string_pretty(&self.entries)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, text).map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hiit-pro-{}-{}", tag, uuid::Uuid::new_v4().simple()))
    }

    #[test]
    fn values_survive_reopen() {
        let dir = scratch_dir("reopen");
        let mut store = LocalStore::open(&dir);
        store.set("monyfit_theme", "ocean").unwrap();

        let reopened = LocalStore::open(&dir);
        assert_eq!(reopened.get("monyfit_theme"), Some("ocean"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STORE_FILE_NAME), "{not json").unwrap();

        let store = LocalStore::open(&dir);
        assert_eq!(store.get("monyfit_theme"), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_json_value_reads_as_none() {
        let mut store = LocalStore::in_memory();
        store.set("numbers", "[1, 2,").unwrap();
        assert_eq!(store.get_json::<Vec<u32>>("numbers"), None);

        store.set_json("numbers", &vec![1u32, 2]).unwrap();
        assert_eq!(store.get_json::<Vec<u32>>("numbers"), Some(vec![1, 2]));
    }
}
