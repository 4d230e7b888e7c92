//! In-memory store, for tests and for hosts without persistent storage.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{PreferenceStore, StoreError};

/// A [`PreferenceStore`] that keeps everything in a `HashMap`.
///
/// Nothing survives the process. Useful in tests and on platforms where the
/// host persists settings itself and only wants the session layer to see a
/// snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Keyed by `(namespace, key)`.
    values: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values across all namespaces.
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(
            (namespace.to_string(), key.to_string()),
            value.to_string(),
        );
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}
