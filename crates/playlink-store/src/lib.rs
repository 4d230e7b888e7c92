//! Preference storage for Playlink.
//!
//! Provides the [`PreferenceStore`] trait that abstracts over wherever the
//! host keeps small durable key/value settings (shared preferences, a
//! file in the app's data dir, a browser's local storage...), plus two
//! implementations.
//!
//! # Feature Flags
//!
//! - `file` (default): [`FileStore`] / [`JsonFileStore`], a durable store
//!   backed by a single codec-encoded file.

mod error;
#[cfg(feature = "file")]
mod file;
mod memory;

pub use error::StoreError;
#[cfg(feature = "file")]
pub use file::{FileStore, JsonFileStore};
pub use memory::MemoryStore;

use std::sync::Arc;

/// Durable string key/value storage, grouped into namespaces.
///
/// The session layer keeps exactly one value in here (the login
/// preference), but the trait is general so a host can back it with the
/// same storage it already uses for its own settings.
///
/// Operations are synchronous: stores are expected to be small and local.
pub trait PreferenceStore: Send + Sync + 'static {
    /// Reads a value. `Ok(None)` means nothing is stored under that key.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value.
    ///
    /// When this returns `Ok`, the value must be visible to the next
    /// [`get`](Self::get), including one made after a process restart,
    /// for durable stores.
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a value. Removing a missing key is not an error.
    fn remove(&self, namespace: &str, key: &str) -> Result<(), StoreError>;
}

/// Lets a caller keep a handle to a store it has given away.
impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(namespace, key)
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(namespace, key, value)
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        (**self).remove(namespace, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_store_shares_state_with_original() {
        let store = Arc::new(MemoryStore::new());
        let handle = Arc::clone(&store);

        handle.set("ns", "k", "v").unwrap();

        assert_eq!(store.get("ns", "k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_store_usable_as_trait_object() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryStore::new());

        store.set("ns", "k", "v").unwrap();
        store.remove("ns", "k").unwrap();

        assert_eq!(store.get("ns", "k").unwrap(), None);
    }
}
