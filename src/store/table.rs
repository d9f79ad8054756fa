//! Store implementation
//!
//! HashMap-based store with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{KvError, Result};

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct Store {
    /// Key-value pairs (insertion order irrelevant)
    data: RwLock<HashMap<String, String>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key (read lock)
    ///
    /// Returns `KeyNotFound` on a miss.
    pub fn get(&self, key: &str) -> Result<String> {
        self.data.read().get(key).cloned().ok_or(KvError::KeyNotFound)
    }

    /// Put a key-value pair (write lock)
    ///
    /// Always succeeds; an existing value is overwritten silently.
    pub fn put(&self, key: String, value: String) {
        self.data.write().insert(key, value);
    }

    /// Delete a key (write lock)
    ///
    /// Returns the removed value, or `KeyNotFound` if the key was absent.
    pub fn delete(&self, key: &str) -> Result<String> {
        self.data.write().remove(key).ok_or(KvError::KeyNotFound)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
