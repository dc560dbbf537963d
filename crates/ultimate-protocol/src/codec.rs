//! Codec trait and the JSON implementation.
//!
//! The server only ever speaks JSON, but handlers go through [`Codec`] so
//! the format lives in one place.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts between Rust values and wire payloads.
///
/// Encoding produces text because every outbound frame is a WebSocket
/// text frame. Decoding accepts raw bytes since inbound frames may be
/// text or binary.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text payload.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a payload back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use ultimate_protocol::{Codec, JsonCodec, Response};
///
/// let codec = JsonCodec;
/// let text = codec.encode(&Response::error("Lobby not found.")).unwrap();
/// assert_eq!(text, r#"{"Error":"Lobby not found."}"#);
///
/// let back: Response = codec.decode(text.as_bytes()).unwrap();
/// assert_eq!(back, Response::error("Lobby not found."));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
