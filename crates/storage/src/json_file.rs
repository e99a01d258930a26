use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use snafu::ResultExt;

use crate::KeyValueStore;
use crate::error::{
    CreateDirSnafu, ParseFileSnafu, ReadFileSnafu, RenameTempFileSnafu, SerializeSnafu,
    StorageError, StorageResult, WriteFileSnafu,
};

/// Key/value store persisted as one flat JSON object on disk.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written file.
#[derive(Debug)]
pub struct JsonFileStore {
    entries: Mutex<BTreeMap<String, String>>,
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store at `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = Self::load_from_disk(&path)?;
        Ok(Self {
            entries: Mutex::new(entries),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> StorageResult<BTreeMap<String, String>> {
        if !path.exists() {
            tracing::info!("store file not found at {:?}, starting empty", path);
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(path).context(ReadFileSnafu {
            stage: "read-store-file",
            path: path.to_path_buf(),
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).context(ParseFileSnafu {
            stage: "parse-store-file",
            path: path.to_path_buf(),
        })
    }

    fn lock(&self, stage: &'static str) -> StorageResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StorageError::LockPoisoned { stage })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-store-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(entries).context(SerializeSnafu {
            stage: "serialize-store-json",
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-store-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.path).context(RenameTempFileSnafu {
            stage: "rename-temporary-store-file",
            from: temp_path,
            to: self.path.clone(),
        })?;

        tracing::debug!("saved store to {:?}", self.path);
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.lock("json-file-get")?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.lock("json-file-set")?;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }

        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn clear(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.lock("json-file-clear")?;
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
