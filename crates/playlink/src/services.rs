//! `GameServicesBuilder`: wires a provider, a store, and a host into a
//! ready-to-use session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use playlink_protocol::{Codec, JsonCodec};
use playlink_session::{AuthProvider, HostApp, SessionConfig, SessionManager};
use playlink_store::{JsonFileStore, MemoryStore, PreferenceStore};

use crate::PlaylinkError;

/// A session manager whose store is chosen at runtime.
pub type GameServices<P, H> = SessionManager<P, Arc<dyn PreferenceStore>, H>;

/// Where the login preference should live.
enum StoreChoice {
    Memory,
    File(PathBuf),
    Custom(Arc<dyn PreferenceStore>),
}

/// Builder for configuring a [`GameServices`] session.
///
/// # Example
///
/// ```rust,ignore
/// use playlink::prelude::*;
///
/// let services = GameServicesBuilder::new()
///     .load_config("game_services.json")?
///     .preference_file(data_dir.join("prefs.json"))
///     .build(provider, host)?;
/// ```
pub struct GameServicesBuilder {
    config: SessionConfig,
    store: StoreChoice,
}

impl GameServicesBuilder {
    /// Creates a builder with default config and an in-memory store.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            store: StoreChoice::Memory,
        }
    }

    /// Replaces the whole session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the session configuration from a JSON file. Missing fields
    /// keep their defaults.
    ///
    /// # Errors
    /// - [`PlaylinkError::Config`]: the file can't be read
    /// - [`PlaylinkError::Protocol`]: the file isn't valid config JSON
    pub fn load_config(mut self, path: impl AsRef<Path>) -> Result<Self, PlaylinkError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PlaylinkError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        self.config = JsonCodec.decode(&bytes)?;
        tracing::debug!(path = %path.display(), "session config loaded");
        Ok(self)
    }

    /// Persists the login preference in a JSON file at `path`.
    pub fn preference_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = StoreChoice::File(path.into());
        self
    }

    /// Uses a host-provided store (e.g. the platform's shared preferences).
    pub fn store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.store = StoreChoice::Custom(store);
        self
    }

    /// Keeps the login preference in memory only. This is the default.
    pub fn memory_store(mut self) -> Self {
        self.store = StoreChoice::Memory;
        self
    }

    /// Opens the store and creates the session manager.
    ///
    /// The returned session is logged out; call
    /// [`init`](SessionManager::init) to start signing in.
    ///
    /// # Errors
    /// Returns [`PlaylinkError::Store`] if the preference file exists but
    /// can't be read or decoded.
    pub fn build<P, H>(self, provider: P, host: H) -> Result<GameServices<P, H>, PlaylinkError>
    where
        P: AuthProvider,
        H: HostApp,
    {
        let store: Arc<dyn PreferenceStore> = match self.store {
            StoreChoice::Memory => Arc::new(MemoryStore::new()),
            StoreChoice::File(path) => Arc::new(JsonFileStore::open(path)?),
            StoreChoice::Custom(store) => store,
        };

        tracing::info!(
            namespace = %self.config.preference_namespace,
            sign_in_request = %self.config.sign_in_request,
            "game services ready"
        );

        Ok(SessionManager::new(Arc::new(provider), store, host, self.config))
    }
}

impl Default for GameServicesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
