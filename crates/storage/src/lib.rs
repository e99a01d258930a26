pub mod error;
pub mod json_file;
pub mod keys;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use json_file::JsonFileStore;
pub use keys::{DEFAULT_APP_NAME, StoreKeys};
pub use memory::MemoryStore;

/// String key/value persistence with browser `localStorage` semantics.
///
/// Absence is meaningful: `get` returning `None` is distinct from any stored
/// value, and `clear` removes the key rather than writing an empty string.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn clear(&self, key: &str) -> StorageResult<()>;
}

impl<T> KeyValueStore for &T
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn clear(&self, key: &str) -> StorageResult<()> {
        (**self).clear(key)
    }
}
