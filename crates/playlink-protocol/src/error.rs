//! Error types for the protocol layer.
//!
//! Each crate in Playlink owns its error enum. A `ProtocolError` always
//! means a value could not be encoded or decoded, never that a
//! store or provider misbehaved.

/// Errors that can occur while encoding or decoding shared values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a value into bytes failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserializing bytes into a value failed.
    ///
    /// Usually a truncated or hand-edited file, or a schema mismatch.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
