use std::collections::HashMap;

use parking_lot::RwLock;

use super::{KeyValueStore, StorageError};

/// Process-lifetime store. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.items.write().clear();
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: &str,
    ) -> Result<bool, StorageError> {
        let mut items = self.items.write();
        if items.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        items.insert(key.to_string(), new.to_string());
        Ok(true)
    }
}
