//! Key-value persistence behind the authority directory.
//!
//! The directory only needs `get`/`set`/`remove` on string values under a
//! fixed key. [`KeyValueStore`] is that seam: the SQLite [`Database`] backs
//! it in production and [`MemoryStore`] backs it in tests and in sessions
//! where nothing should touch disk.

pub mod memory;

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::db::Database;
use crate::errors::StorageError;

pub use memory::MemoryStore;

/// A fallible string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get_state(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_state(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.delete_state(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
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

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
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

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
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

/// Open the backend selected by `config`. The SQLite backend is created
/// and migrated if needed.
pub fn open_backend(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, StorageError> {
    match config.backend {
        StorageBackend::Sqlite => {
            let db = Database::new(config.database_path())?;
            db.initialize()?;
            Ok(Box::new(db))
        }
        StorageBackend::Memory => {
            info!("using in-memory storage, edits will not be kept");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_database_backend() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        exercise(&db);
    }

    #[test]
    fn test_memory_backend() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_open_sqlite_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };
        let store = open_backend(&config).unwrap();
        exercise(&store);
        assert!(config.database_path().exists());
    }

    #[test]
    fn test_open_memory_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        exercise(&open_backend(&config).unwrap());
    }

    #[test]
    fn test_shared_backend() {
        let store = Arc::new(MemoryStore::new());
        exercise(&store);
        let as_dyn: Arc<dyn KeyValueStore> = store;
        exercise(&as_dyn);
    }
}
