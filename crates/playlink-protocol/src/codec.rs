//! Codec trait and implementations for persisting shared values.
//!
//! Nothing in Playlink sends bytes over a network; the platform SDK owns
//! that. Bytes only appear when something is written to disk: the
//! preference file and the optional session configuration file. Both go
//! through a [`Codec`] so the on-disk format can be swapped without
//! touching the store or the config loader.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because a codec lives inside long-lived stores
/// that may be shared across Tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`, pretty-printed.
///
/// Preference files are tiny and occasionally inspected by hand on a
/// device, so readability wins over size here.
///
/// ## Example
///
/// ```rust
/// use playlink_protocol::{AccountId, Codec, Identity, JsonCodec};
///
/// let codec = JsonCodec;
/// let identity = Identity::new(AccountId::from("g-1234"));
///
/// let bytes = codec.encode(&identity).unwrap();
/// let decoded: Identity = codec.decode(&bytes).unwrap();
/// assert_eq!(identity, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec_pretty(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
