//! In-memory session storage
//!
//! String key/value store with the semantics of a browser tab's
//! `sessionStorage`: every clone sees the same entries.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::Result;

pub struct SessionStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: &str) {
        self.items
            .write()
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove_item(&self, key: &str) {
        self.items.write().remove(key);
    }

    pub fn clear(&self) {
        self.items.write().clear();
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Read a JSON-encoded value
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Store a value JSON-encoded
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw);
        Ok(())
    }
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionStorage {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}
