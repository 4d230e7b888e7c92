//! Durable store backed by a single codec-encoded file.
//!
//! The whole file is rewritten on every change. That's fine for the
//! handful of values a game keeps here and lets the write be atomic: the
//! new contents go to a temporary file in the same directory, which is
//! then renamed over the old one. A crash mid-write leaves the previous
//! version intact.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use playlink_protocol::{Codec, JsonCodec};

use crate::{PreferenceStore, StoreError};

/// `namespace -> key -> value`. `BTreeMap` keeps the file diff-friendly.
type Namespaces = BTreeMap<String, BTreeMap<String, String>>;

/// A [`PreferenceStore`] persisted to one file through a [`Codec`].
///
/// Reads are served from an in-memory copy loaded at [`open`](FileStore::open_with);
/// writes update the file first and the copy only once the file is safely
/// replaced, so a failed write never leaves memory and disk disagreeing.
pub struct FileStore<C: Codec = JsonCodec> {
    path: PathBuf,
    codec: C,
    cache: Mutex<Namespaces>,
}

/// The usual choice: a pretty-printed JSON file.
pub type JsonFileStore = FileStore<JsonCodec>;

impl FileStore<JsonCodec> {
    /// Opens (or lazily creates) a JSON preference file at `path`.
    ///
    /// # Errors
    /// - [`StoreError::Read`]: the file exists but can't be read
    /// - [`StoreError::Corrupt`]: the file can't be decoded
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with(path, JsonCodec)
    }
}

impl<C: Codec> FileStore<C> {
    /// Opens a preference file using the given codec.
    ///
    /// A missing or empty file is treated as an empty store; nothing is
    /// written until the first [`set`](PreferenceStore::set).
    pub fn open_with(path: impl Into<PathBuf>, codec: C) -> Result<Self, StoreError> {
        let path = path.into();

        let cache = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Namespaces::new(),
            Ok(bytes) => codec.decode(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Namespaces::new()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        tracing::debug!(path = %path.display(), "preference file opened");

        Ok(Self {
            path,
            codec,
            cache: Mutex::new(cache),
        })
    }

    /// Where this store lives on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the cached values, writes the copy to
    /// disk, and only then swaps it into the cache.
    fn update(&self, change: impl FnOnce(&mut Namespaces)) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().map_err(|_| StoreError::Poisoned)?;

        let mut next = cache.clone();
        change(&mut next);
        if next == *cache {
            return Ok(());
        }

        self.write_atomically(&next)?;
        *cache = next;
        Ok(())
    }

    fn write_atomically(&self, values: &Namespaces) -> Result<(), StoreError> {
        let bytes = self.codec.encode(values)?;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        // `Path::new("prefs.json").parent()` is `Some("")`, not `None`.
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::trace!(path = %self.path.display(), "preference file written");
        Ok(())
    }
}

impl<C: Codec> PreferenceStore for FileStore<C> {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let cache = self.cache.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(cache.get(namespace).and_then(|ns| ns.get(key)).cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|values| {
            values
                .entry(namespace.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        self.update(|values| {
            if let Some(ns) = values.get_mut(namespace) {
                ns.remove(key);
                if ns.is_empty() {
                    values.remove(namespace);
                }
            }
        })
    }
}
