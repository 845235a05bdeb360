//! Key/value storage backends
//!
//! The browser build talks to `window.localStorage` (see `web::LocalStorage`).
//! Native builds and tests use [`MemoryStorage`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

/// Storage backend failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage available (private mode, sandboxed iframe, no window)
    #[error("storage is unavailable")]
    Unavailable,
    /// The backend refused the operation (quota exceeded, security error)
    #[error("storage {op} failed: {message}")]
    Backend { op: &'static str, message: String },
}

/// String key/value storage with LocalStorage semantics
pub trait KeyValueStore {
    /// Read a key, `None` if absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Write a key, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove a key. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// In-memory storage. Clones share the same map, like two handles to one
/// `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    /// Fail every write (simulates a full quota)
    read_only: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with a backend error
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn check_writable(&self, op: &'static str) -> Result<(), StorageError> {
        if self.read_only.get() {
            return Err(StorageError::Backend {
                op,
                message: "QuotaExceededError".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable("setItem")?;
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable("removeItem")?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_items() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
        b.remove_item("k").unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove_item("missing").is_ok());
        assert_eq!(storage.get_item("missing").unwrap(), None);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "v").unwrap();
        storage.set_read_only(true);
        let err = storage.set_item("k", "w").unwrap_err();
        assert!(matches!(err, StorageError::Backend { op: "setItem", .. }));
        // Reads still work
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
