//! Turning [`ClientCommand`]s and [`ServerEvent`]s into frames and back.
//!
//! The browser client speaks JSON, so [`JsonCodec`] is the one the server
//! uses. The [`Codec`] trait keeps that choice in one place.

use serde::{de::DeserializeOwned, Serialize};

use crate::{ClientCommand, ProtocolError, ServerEvent};

/// Converts values to frame payloads and back.
///
/// One instance is shared by the hub and every connection task, hence
/// `Send + Sync + 'static`.
pub trait Codec: Send + Sync + 'static {
    /// # Errors
    /// `ProtocolError::Encode` if the value cannot be represented.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// # Errors
    /// `ProtocolError::Decode` for malformed input, an unknown `type` tag,
    /// or missing fields.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;

    /// Decodes one frame from a player.
    fn decode_command(&self, data: &[u8]) -> Result<ClientCommand, ProtocolError> {
        self.decode(data)
    }

    /// Encodes one event for delivery.
    fn encode_event(&self, event: &ServerEvent) -> Result<Vec<u8>, ProtocolError> {
        self.encode(event)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// JSON text via `serde_json`, the format the browser client uses.
///
/// ## Example
///
/// ```rust
/// use scrawl_protocol::{ClientCommand, Codec, JsonCodec, RoomCode};
///
/// let codec = JsonCodec;
/// let bytes = br#"{"type":"start-game","roomId":"ab2cd"}"#;
///
/// let cmd = codec.decode_command(bytes).unwrap();
/// assert_eq!(
///     cmd,
///     ClientCommand::StartGame { room_id: RoomCode::new("AB2CD") }
/// );
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
