use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StorageError, StorageResult};
use crate::KeyValueStore;

/// Process-local store; contents vanish when it drops.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    pub fn contains_key(&self, key: &str) -> StorageResult<bool> {
        let entries = self.lock("memory-contains-key")?;
        Ok(entries.contains_key(key))
    }

    fn lock(
        &self,
        stage: &'static str,
    ) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StorageError::LockPoisoned { stage })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.lock("memory-get")?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.lock("memory-set")?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.lock("memory-clear")?;
        entries.remove(key);
        Ok(())
    }
}
