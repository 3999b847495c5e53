//! Room registry: creates, looks up, and deletes rooms, and turns client
//! events into room transitions plus the effects they cause.

use std::collections::HashMap;

use gridlock_protocol::{
    AckResult, ClientEvent, GameResult, MoveRequest, Notice, PlayerId, Request,
    RoomId, RoomSnapshot, ServerEvent,
};

use crate::{Effect, MoveOutcome, MoveRejection, Room, RoomError, RoomPhase};

/// What an operation returned, plus the effects it produced.
///
/// The effects must be dispatched for clients to see the change; the
/// registry state is already updated either way.
#[must_use = "effects must be dispatched for clients to see the change"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub result: T,
    pub effects: Vec<Effect>,
}

impl<T> Outcome<T> {
    fn quiet(result: T) -> Self {
        Self {
            result,
            effects: Vec::new(),
        }
    }
}

/// All live rooms, keyed by their caller-chosen id.
///
/// Like any plain collection this is not synchronized; the server owns
/// one instance behind a mutex and every event is applied to completion
/// while holding it. A room with no players is never kept: removal of
/// the last player deletes the entry.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a room with `player` in the X seat.
    ///
    /// # Errors
    /// [`RoomError::InvalidInput`] for an empty id,
    /// [`RoomError::AlreadyExists`] if the id is taken.
    pub fn create_room(
        &mut self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Outcome<Result<RoomSnapshot, RoomError>> {
        if room_id.is_empty() {
            return Outcome::quiet(Err(RoomError::InvalidInput));
        }
        if self.rooms.contains_key(&room_id) {
            tracing::debug!(%room_id, %player, "create refused, room exists");
            return Outcome::quiet(Err(RoomError::AlreadyExists(room_id)));
        }

        let room = Room::new(room_id.clone(), player);
        let snapshot = room.snapshot();
        self.rooms.insert(room_id.clone(), room);
        tracing::info!(%room_id, %player, "room created");

        let effects = vec![
            Effect::JoinGroup {
                player,
                room: room_id.clone(),
            },
            Effect::Broadcast {
                room: room_id.clone(),
                event: ServerEvent::RoomUpdate(snapshot.clone()),
            },
            Effect::Broadcast {
                room: room_id,
                event: ServerEvent::PlayerCount(1),
            },
        ];
        Outcome {
            result: Ok(snapshot),
            effects,
        }
    }

    /// Seats `player` in an existing room.
    ///
    /// When this fills the second seat, `opponentJoined` is broadcast
    /// after the usual `roomUpdate` and `playerCount`.
    ///
    /// # Errors
    /// [`RoomError::InvalidInput`], [`RoomError::NotFound`],
    /// [`RoomError::RoomFull`].
    pub fn join_room(
        &mut self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Outcome<Result<RoomSnapshot, RoomError>> {
        if room_id.is_empty() {
            return Outcome::quiet(Err(RoomError::InvalidInput));
        }
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Outcome::quiet(Err(RoomError::NotFound(room_id)));
        };
        if let Err(e) = room.seat(player) {
            tracing::debug!(%room_id, %player, "join refused, room full");
            return Outcome::quiet(Err(e));
        }

        let snapshot = room.snapshot();
        let count = room.player_count();
        tracing::info!(
            %room_id,
            %player,
            players = count,
            phase = %room.phase(),
            "player joined"
        );

        let mut effects = vec![
            Effect::JoinGroup {
                player,
                room: room_id.clone(),
            },
            Effect::Broadcast {
                room: room_id.clone(),
                event: ServerEvent::RoomUpdate(snapshot.clone()),
            },
            Effect::Broadcast {
                room: room_id.clone(),
                event: ServerEvent::PlayerCount(count),
            },
        ];
        if count == crate::MAX_PLAYERS {
            effects.push(Effect::Broadcast {
                room: room_id,
                event: ServerEvent::OpponentJoined(Notice::opponent_joined()),
            });
        }
        Outcome {
            result: Ok(snapshot),
            effects,
        }
    }

    /// Returns a snapshot of the room.
    ///
    /// # Errors
    /// [`RoomError::NoSuchRoom`] if no such room exists (including the
    /// empty id, which can never be registered).
    pub fn get_room_state(
        &self,
        room_id: &RoomId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.rooms
            .get(room_id)
            .map(Room::snapshot)
            .ok_or_else(|| RoomError::NoSuchRoom(room_id.clone()))
    }

    /// Applies a move to the room's board.
    ///
    /// Illegal moves produce no effects. A legal move broadcasts either
    /// `gameOver` (win or draw) or a `roomUpdate` with the new turn.
    /// `player` is only used for logging: any connection may move, and
    /// it plays whichever mark is due.
    pub fn apply_move(
        &mut self,
        room_id: &RoomId,
        index: usize,
        player: PlayerId,
    ) -> Outcome<MoveOutcome> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            tracing::debug!(%room_id, %player, "move for unknown room ignored");
            return Outcome::quiet(MoveOutcome::Rejected(
                MoveRejection::RoomNotFound,
            ));
        };
        if !room.contains(player) {
            tracing::debug!(%room_id, %player, "move from unseated connection");
        }

        let outcome = room.apply_move(index);
        let event = match outcome {
            MoveOutcome::Rejected(reason) => {
                tracing::debug!(%room_id, %player, index, ?reason, "move rejected");
                return Outcome::quiet(outcome);
            }
            MoveOutcome::Won(winner) => {
                tracing::info!(%room_id, %winner, "game won");
                ServerEvent::GameOver(GameResult::win(winner, *room.board()))
            }
            MoveOutcome::Draw => {
                tracing::info!(%room_id, "game drawn");
                ServerEvent::GameOver(GameResult::draw(*room.board()))
            }
            MoveOutcome::Placed { next } => {
                tracing::debug!(%room_id, %player, index, turn = %next, "move accepted");
                ServerEvent::RoomUpdate(room.snapshot())
            }
        };

        Outcome {
            result: outcome,
            effects: vec![Effect::Broadcast {
                room: room_id.clone(),
                event,
            }],
        }
    }

    /// Removes `player` from the room if seated there.
    ///
    /// Idempotent: unknown rooms and unseated players are no-ops. The
    /// player leaves the broadcast group first, so the `playerCount` and
    /// `opponentLeft` that follow reach only the remaining participant.
    /// An emptied room is deleted instead. Returns whether a seat was
    /// freed.
    pub fn remove_player(
        &mut self,
        room_id: &RoomId,
        player: PlayerId,
    ) -> Outcome<bool> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return Outcome::quiet(false);
        };
        if !room.unseat(player) {
            return Outcome::quiet(false);
        }

        let mut effects = vec![Effect::LeaveGroup {
            player,
            room: room_id.clone(),
        }];

        if room.is_empty() {
            self.rooms.remove(room_id);
            tracing::info!(%room_id, "room deleted, no players left");
        } else {
            let count = room.player_count();
            tracing::info!(%room_id, %player, players = count, "player left");
            effects.push(Effect::Broadcast {
                room: room_id.clone(),
                event: ServerEvent::PlayerCount(count),
            });
            effects.push(Effect::Broadcast {
                room: room_id.clone(),
                event: ServerEvent::OpponentLeft(Notice::opponent_left()),
            });
        }

        Outcome {
            result: true,
            effects,
        }
    }

    /// Removes a dropped connection from every room it is seated in.
    ///
    /// Returns the ids of the rooms it left, in sorted order.
    pub fn disconnect_all(&mut self, player: PlayerId) -> Outcome<Vec<RoomId>> {
        let mut held: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.contains(player))
            .map(|room| room.id().clone())
            .collect();
        held.sort();

        let mut effects = Vec::new();
        for room_id in &held {
            effects.extend(self.remove_player(room_id, player).effects);
        }
        if !held.is_empty() {
            tracing::info!(%player, rooms = held.len(), "disconnected player removed");
        }

        Outcome {
            result: held,
            effects,
        }
    }

    /// Applies one client request and returns everything to dispatch.
    ///
    /// Broadcasts come first; if the request carried an `ack` id and the
    /// event is request-style (create, join, state), the acknowledgment
    /// to the requester is the last effect.
    pub fn handle(&mut self, player: PlayerId, request: Request) -> Vec<Effect> {
        let Request { ack, event } = request;
        tracing::debug!(%player, ?event, "event received");
        let ack = ack.filter(|_| event.expects_ack());

        let (reply, mut effects) = match event {
            ClientEvent::CreateRoom(room_id) => {
                let outcome = self.create_room(room_id, player);
                (Some(outcome.result), outcome.effects)
            }
            ClientEvent::JoinRoom(room_id) => {
                let outcome = self.join_room(room_id, player);
                (Some(outcome.result), outcome.effects)
            }
            ClientEvent::GetRoomState(room_id) => {
                (Some(self.get_room_state(&room_id)), Vec::new())
            }
            ClientEvent::MakeMove(MoveRequest { room_id, index }) => {
                (None, self.apply_move(&room_id, index, player).effects)
            }
            ClientEvent::LeaveRoom(room_id) => {
                (None, self.remove_player(&room_id, player).effects)
            }
        };

        if let (Some(id), Some(reply)) = (ack, reply) {
            let result = match reply {
                Ok(room) => AckResult::ok(room),
                Err(e) => AckResult::err(e.to_string()),
            };
            effects.push(Effect::SendTo {
                player,
                event: ServerEvent::Ack { id, result },
            });
        }
        effects
    }

    /// Returns the phase of a room, if it exists.
    pub fn room_phase(&self, room_id: &RoomId) -> Option<RoomPhase> {
        self.rooms.get(room_id).map(Room::phase)
    }

    /// Returns `true` if a room with this id is registered.
    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
