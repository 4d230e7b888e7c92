//! Unified error type for Playlink.

use std::path::PathBuf;

use playlink_protocol::ProtocolError;
use playlink_session::SessionError;
use playlink_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// Only setup can fail this way (opening the preference file, loading a
/// config file). Once a [`GameServices`](crate::GameServices) exists, its
/// sign-in and pass-through operations never return errors.
#[derive(Debug, thiserror::Error)]
pub enum PlaylinkError {
    /// Encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The preference store could not be opened or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session-level error (store access through the session manager).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use playlink_protocol::{Codec, JsonCodec};

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = JsonCodec.decode::<String>(b"{ nope").unwrap_err();
        let playlink_err: PlaylinkError = err.into();
        assert!(matches!(playlink_err, PlaylinkError::Protocol(_)));
        assert!(playlink_err.to_string().starts_with("decode failed"));
    }

    #[test]
    fn test_from_store_error() {
        let playlink_err: PlaylinkError = StoreError::Poisoned.into();
        assert!(matches!(playlink_err, PlaylinkError::Store(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthFailed("nope".into());
        let playlink_err: PlaylinkError = err.into();
        assert!(matches!(playlink_err, PlaylinkError::Session(_)));
        assert_eq!(playlink_err.to_string(), "authentication failed: nope");
    }

    #[test]
    fn test_config_error_names_path() {
        let err = PlaylinkError::Config {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("missing.json"));
    }
}
