//! Core protocol types for gridlock's wire format.
//!
//! Everything in this module travels on the wire: clients send a
//! [`Request`] wrapping a [`ClientEvent`], and the server answers with
//! [`ServerEvent`]s, either broadcast to a room or addressed to a single
//! connection as an acknowledgment.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Number of cells on a tic-tac-toe board.
pub const BOARD_SIZE: usize = 9;

/// A board is exactly nine cells, row-major. `None` is an empty cell.
///
/// Using a fixed-size array means the "always 9 cells" rule holds by
/// construction; serde encodes it as a 9-element JSON array of `"X"`,
/// `"O"` or `null`.
pub type Board = [Option<Mark>; BOARD_SIZE];

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque identifier for a connected client.
///
/// The server has no notion of accounts: a player *is* their connection,
/// so this is assigned from the transport's connection id.
///
/// `#[serde(transparent)]` encodes `PlayerId(42)` as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A caller-chosen room name.
///
/// Clients pick the identifier themselves (e.g. share "abc" with a
/// friend), so unlike a generated id it can be empty on the wire. The
/// registry rejects empty ids; this type only carries the string.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps a room name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the room name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Marks and room snapshots
// ---------------------------------------------------------------------------

/// A player's mark. The first player in a room plays `X` and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::O => f.write_str("O"),
        }
    }
}

/// Read-only copy of a room, as sent in `roomUpdate` and acknowledgments.
///
/// Field names are camelCase on the wire (`gameOver`) to match what
/// browser clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Seated players in join order. Index 0 plays X, index 1 plays O.
    pub players: Vec<PlayerId>,
    pub board: Board,
    /// Whose move it is. Stale once `game_over` is set.
    pub turn: Mark,
    pub game_over: bool,
}

/// Final result of a game, broadcast as `gameOver`.
///
/// A win carries `winner`; a draw carries `winner: null` and
/// `draw: true`. The `draw` key is omitted entirely for wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<Mark>,
    pub board: Board,
    #[serde(default, skip_serializing_if = "is_false")]
    pub draw: bool,
}

impl GameResult {
    /// A game won by `winner`.
    pub fn win(winner: Mark, board: Board) -> Self {
        Self {
            winner: Some(winner),
            board,
            draw: false,
        }
    }

    /// A game that filled the board without a winner.
    pub fn draw(board: Board) -> Self {
        Self {
            winner: None,
            board,
            draw: true,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Informational message attached to `opponentJoined` / `opponentLeft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn opponent_joined() -> Self {
        Self {
            message: "Your opponent has joined!".to_string(),
        }
    }

    pub fn opponent_left() -> Self {
        Self {
            message: "Your opponent has left!".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Payload of `makeMove`: which room, and which cell (0–8, row-major).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub room_id: RoomId,
    pub index: usize,
}

/// Events a client can send.
///
/// Adjacently tagged, so each event looks like
/// `{ "name": "joinRoom", "data": "abc" }`.
///
/// Room-id payloads are read leniently: `null`, a missing `data`, or a
/// non-string value becomes the empty [`RoomId`], which the registry
/// answers with an "empty id" error instead of the frame being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    CreateRoom(RoomId),
    JoinRoom(RoomId),
    MakeMove(MoveRequest),
    LeaveRoom(RoomId),
    GetRoomState(RoomId),
}

impl ClientEvent {
    /// Returns `true` for events that answer with an acknowledgment.
    ///
    /// Moves and leaves are fire-and-forget; an `ack` id attached to
    /// them is ignored.
    pub fn expects_ack(&self) -> bool {
        matches!(
            self,
            Self::CreateRoom(_) | Self::JoinRoom(_) | Self::GetRoomState(_)
        )
    }
}

/// Event names, as they appear in the `name` field.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
enum EventName {
    CreateRoom,
    JoinRoom,
    MakeMove,
    LeaveRoom,
    GetRoomState,
}

/// Whatever was in `data`, classified by shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Text(String),
    Move(MoveRequest),
    Other(#[allow(dead_code)] serde::de::IgnoredAny),
}

/// First decoding stage of a [`ClientEvent`]: the name is checked, the
/// payload is only classified.
#[derive(Deserialize)]
struct RawEvent {
    name: EventName,
    #[serde(default)]
    data: Option<RawPayload>,
}

impl RawEvent {
    fn into_event(self) -> Result<ClientEvent, &'static str> {
        let room_id = |data: Option<RawPayload>| match data {
            Some(RawPayload::Text(id)) => RoomId::from(id),
            _ => RoomId::default(),
        };
        Ok(match self.name {
            EventName::CreateRoom => ClientEvent::CreateRoom(room_id(self.data)),
            EventName::JoinRoom => ClientEvent::JoinRoom(room_id(self.data)),
            EventName::LeaveRoom => ClientEvent::LeaveRoom(room_id(self.data)),
            EventName::GetRoomState => {
                ClientEvent::GetRoomState(room_id(self.data))
            }
            EventName::MakeMove => match self.data {
                Some(RawPayload::Move(request)) => ClientEvent::MakeMove(request),
                _ => return Err("makeMove needs a roomId and a non-negative index"),
            },
        })
    }
}

impl<'de> Deserialize<'de> for ClientEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawEvent::deserialize(deserializer)?
            .into_event()
            .map_err(serde::de::Error::custom)
    }
}

/// A client frame: an event plus an optional acknowledgment id.
///
/// When `ack` is present the server answers the requester directly with
/// a [`ServerEvent::Ack`] carrying the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
    pub event: ClientEvent,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Result of a request-style event, delivered only to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomSnapshot>,
}

impl AckResult {
    pub fn ok(room: RoomSnapshot) -> Self {
        Self {
            success: true,
            error: None,
            room: Some(room),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            room: None,
        }
    }
}

/// Events the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Full room snapshot after a change.
    RoomUpdate(RoomSnapshot),
    /// Number of seated players.
    PlayerCount(usize),
    OpponentJoined(Notice),
    OpponentLeft(Notice),
    /// Terminal result; no further moves are accepted in the room.
    GameOver(GameResult),
    /// Direct answer to a request that carried an `ack` id.
    Ack { id: u64, result: AckResult },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The browser client parses these shapes directly, so the tests pin
    //! the exact JSON layout rather than just round-tripping.

    use super::*;
    use serde_json::json;

    fn empty_board() -> Board {
        [None; BOARD_SIZE]
    }

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomId::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
        assert_eq!(RoomId::from("abc").to_string(), "abc");
        assert!(RoomId::from("").is_empty());
    }

    #[test]
    fn test_mark_opponent_alternates() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
        assert_eq!(Mark::X.opponent().opponent(), Mark::X);
    }

    #[test]
    fn test_room_snapshot_json_format() {
        let mut board = empty_board();
        board[0] = Some(Mark::X);
        let snapshot = RoomSnapshot {
            players: vec![PlayerId(1), PlayerId(2)],
            board,
            turn: Mark::O,
            game_over: false,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({
                "players": [1, 2],
                "board": ["X", null, null, null, null, null, null, null, null],
                "turn": "O",
                "gameOver": false,
            })
        );
    }

    #[test]
    fn test_game_result_win_omits_draw_key() {
        let value =
            serde_json::to_value(GameResult::win(Mark::X, empty_board()))
                .unwrap();
        assert_eq!(value["winner"], "X");
        assert!(value.get("draw").is_none());
    }

    #[test]
    fn test_game_result_draw_has_null_winner() {
        let value =
            serde_json::to_value(GameResult::draw(empty_board())).unwrap();
        assert!(value["winner"].is_null());
        assert_eq!(value["draw"], true);
    }

    #[test]
    fn test_request_create_room_parses() {
        let raw = r#"{"ack": 3, "event": {"name": "createRoom", "data": "abc"}}"#;
        let req: Request = serde_json::from_str(raw).unwrap();
        assert_eq!(req.ack, Some(3));
        assert_eq!(req.event, ClientEvent::CreateRoom(RoomId::from("abc")));
        assert!(req.event.expects_ack());
    }

    #[test]
    fn test_request_without_ack_parses() {
        let raw = r#"{"event": {"name": "leaveRoom", "data": "abc"}}"#;
        let req: Request = serde_json::from_str(raw).unwrap();
        assert_eq!(req.ack, None);
        assert!(!req.event.expects_ack());
    }

    #[test]
    fn test_make_move_uses_camel_case_room_id() {
        let raw = r#"{"event": {"name": "makeMove", "data": {"roomId": "abc", "index": 4}}}"#;
        let req: Request = serde_json::from_str(raw).unwrap();
        assert_eq!(
            req.event,
            ClientEvent::MakeMove(MoveRequest {
                room_id: RoomId::from("abc"),
                index: 4,
            })
        );
    }

    #[test]
    fn test_make_move_with_negative_index_is_rejected() {
        let raw = r#"{"event": {"name": "makeMove", "data": {"roomId": "abc", "index": -1}}}"#;
        assert!(serde_json::from_str::<Request>(raw).is_err());
    }

    #[test]
    fn test_non_string_room_id_reads_as_empty() {
        for data in ["null", "42", "{\"id\": \"abc\"}", "[\"abc\"]"] {
            let raw = format!(
                r#"{{"ack": 1, "event": {{"name": "createRoom", "data": {data}}}}}"#
            );
            let req: Request = serde_json::from_str(&raw).unwrap();
            assert_eq!(req.ack, Some(1));
            assert_eq!(req.event, ClientEvent::CreateRoom(RoomId::default()));
        }
    }

    #[test]
    fn test_missing_room_id_reads_as_empty() {
        let raw = r#"{"ack": 2, "event": {"name": "joinRoom"}}"#;
        let req: Request = serde_json::from_str(raw).unwrap();
        assert_eq!(req.event, ClientEvent::JoinRoom(RoomId::default()));
        assert!(req.event.expects_ack());
    }

    #[test]
    fn test_make_move_without_payload_is_rejected() {
        for raw in [
            r#"{"event": {"name": "makeMove"}}"#,
            r#"{"event": {"name": "makeMove", "data": "abc"}}"#,
            r#"{"event": {"name": "makeMove", "data": {"roomId": "abc"}}}"#,
        ] {
            assert!(serde_json::from_str::<Request>(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn test_client_event_serializes_adjacently_tagged() {
        let value =
            serde_json::to_value(ClientEvent::JoinRoom(RoomId::from("abc")))
                .unwrap();
        assert_eq!(value, json!({ "name": "joinRoom", "data": "abc" }));
    }

    #[test]
    fn test_unknown_event_name_is_rejected() {
        let raw = r#"{"event": {"name": "flyToMoon", "data": 1}}"#;
        assert!(serde_json::from_str::<Request>(raw).is_err());
    }

    #[test]
    fn test_ack_error_json_format() {
        let event = ServerEvent::Ack {
            id: 9,
            result: AckResult::err("Room is full"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "ack",
                "data": {
                    "id": 9,
                    "result": { "success": false, "error": "Room is full" },
                },
            })
        );
    }

    #[test]
    fn test_player_count_and_notice_json_format() {
        let value = serde_json::to_value(ServerEvent::PlayerCount(2)).unwrap();
        assert_eq!(value, json!({ "name": "playerCount", "data": 2 }));

        let value =
            serde_json::to_value(ServerEvent::OpponentLeft(Notice::opponent_left()))
                .unwrap();
        assert_eq!(value["name"], "opponentLeft");
        assert_eq!(value["data"]["message"], "Your opponent has left!");
    }
}
