//! Key-value persistence contract.
//!
//! Values are JSON documents. A missing key is `Ok(None)`, not an error.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::PersistenceError;

/// Durable JSON key-value storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<Value>, PersistenceError>;
    fn set_item(&self, key: &str, value: &Value) -> Result<(), PersistenceError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        (**self).set_item(key, value)
    }
}

/// In-process store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        let items = self
            .items
            .lock()
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        items.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get_item("missing").unwrap().is_none());
        store.set_item("k", &json!({"a": 1})).unwrap();
        assert_eq!(store.get_item("k").unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn borrowed_store_delegates() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref.set_item("k", &json!(3)).unwrap();
        assert_eq!(store.get_item("k").unwrap(), Some(json!(3)));
    }
}
