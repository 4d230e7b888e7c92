use std::path::PathBuf;

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the backing file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or replacing the backing file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but its contents can't be decoded.
    #[error("corrupt preference data: {0}")]
    Corrupt(#[from] playlink_protocol::ProtocolError),

    /// A previous writer panicked while holding the store's lock.
    #[error("preference store lock poisoned")]
    Poisoned,
}
