use natter_storage::{KeyValueStore, StorageError, StorageResult};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `window.localStorage` behind the store trait.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn from_window() -> Result<Self, JsValue> {
        let storage = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .local_storage()?
            .ok_or_else(|| JsValue::from_str("localStorage is unavailable"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|error| backend_error("local-storage-get", key, error))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|error| backend_error("local-storage-set", key, error))
    }

    fn clear(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|error| backend_error("local-storage-remove", key, error))
    }
}

fn backend_error(stage: &'static str, key: &str, error: JsValue) -> StorageError {
    StorageError::Backend {
        stage,
        key: key.to_string(),
        details: format!("{error:?}"),
    }
}
