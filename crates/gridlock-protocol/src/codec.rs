//! Codec trait and implementations for serializing/deserializing events.
//!
//! The server never touches `serde_json` directly: it goes through a
//! [`Codec`], so the connection handler and its tests stay independent
//! of the wire format.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because a single codec instance lives in the
/// shared server state and is used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or
    /// don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON output is always valid UTF-8, so the transport sends it as
/// WebSocket text frames that browsers can read without a `Blob` detour.
///
/// ## Example
///
/// ```rust
/// use gridlock_protocol::{Codec, JsonCodec, ServerEvent};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&ServerEvent::PlayerCount(2)).unwrap();
/// assert_eq!(bytes, br#"{"name":"playerCount","data":2}"#);
///
/// let decoded: ServerEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, ServerEvent::PlayerCount(2));
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

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientEvent, Request, RoomId};

    #[test]
    fn test_json_codec_decodes_client_request() {
        let req: Request = JsonCodec
            .decode(br#"{"ack":1,"event":{"name":"getRoomState","data":"r1"}}"#)
            .unwrap();
        assert_eq!(req.event, ClientEvent::GetRoomState(RoomId::from("r1")));
    }

    #[test]
    fn test_json_codec_keeps_ack_when_room_id_is_null() {
        let req: Request = JsonCodec
            .decode(br#"{"ack":1,"event":{"name":"createRoom","data":null}}"#)
            .unwrap();
        assert_eq!(req.ack, Some(1));
        assert_eq!(req.event, ClientEvent::CreateRoom(RoomId::default()));
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<Request, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
