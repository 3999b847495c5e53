//! Error types for the room layer.

use gridlock_protocol::RoomId;

/// Errors reported to a requester when a room operation is refused.
///
/// The `Display` text is what the client sees in the acknowledgment's
/// `error` field, so it never includes the room id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room identifier is empty or was not a string.
    #[error("Room ID cannot be empty")]
    InvalidInput,

    /// A room with this identifier is already registered.
    #[error("Room already exists")]
    AlreadyExists(RoomId),

    /// Join target does not exist.
    #[error("Room does not exist")]
    NotFound(RoomId),

    /// State lookup for a room that does not exist.
    #[error("Room not found")]
    NoSuchRoom(RoomId),

    /// The room already seats two players.
    #[error("Room is full")]
    RoomFull(RoomId),
}
