//! Outbound effects and the group-delivery capability they are applied to.
//!
//! Registry operations never perform I/O. They return a list of
//! [`Effect`]s describing who joins which broadcast group and what gets
//! sent where; the server hands that list to a [`GroupSink`] backed by
//! real connections, and tests hand it to a recorder.

use gridlock_protocol::{PlayerId, RoomId, ServerEvent};

/// One thing the transport should do as a result of a room operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Subscribe `player` to the room's broadcast group.
    JoinGroup { player: PlayerId, room: RoomId },
    /// Unsubscribe `player` from the room's broadcast group.
    LeaveGroup { player: PlayerId, room: RoomId },
    /// Deliver `event` to every member of the room's group.
    Broadcast { room: RoomId, event: ServerEvent },
    /// Deliver `event` to a single connection (acknowledgments).
    SendTo { player: PlayerId, event: ServerEvent },
}

/// The messaging capability the room layer needs from the transport.
///
/// Delivery is fire-and-forget: implementations must not block, and a
/// send to a connection that has gone away is silently dropped.
pub trait GroupSink {
    fn join_group(&mut self, player: PlayerId, room: &RoomId);

    fn leave_group(&mut self, player: PlayerId, room: &RoomId);

    fn broadcast(&self, room: &RoomId, event: &ServerEvent);

    fn send_to(&self, player: PlayerId, event: ServerEvent);
}

impl Effect {
    /// Performs this effect against `sink`.
    pub fn apply<S: GroupSink + ?Sized>(self, sink: &mut S) {
        match self {
            Self::JoinGroup { player, room } => sink.join_group(player, &room),
            Self::LeaveGroup { player, room } => {
                sink.leave_group(player, &room)
            }
            Self::Broadcast { room, event } => sink.broadcast(&room, &event),
            Self::SendTo { player, event } => sink.send_to(player, event),
        }
    }
}

/// Applies `effects` to `sink` in order.
pub fn dispatch<S, I>(effects: I, sink: &mut S)
where
    S: GroupSink + ?Sized,
    I: IntoIterator<Item = Effect>,
{
    for effect in effects {
        effect.apply(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    /// Minimal in-memory sink: tracks membership and records deliveries
    /// per player.
    #[derive(Default)]
    struct Inbox {
        groups: BTreeMap<RoomId, BTreeSet<u64>>,
        delivered: std::cell::RefCell<Vec<(u64, ServerEvent)>>,
    }

    impl GroupSink for Inbox {
        fn join_group(&mut self, player: PlayerId, room: &RoomId) {
            self.groups.entry(room.clone()).or_default().insert(player.0);
        }

        fn leave_group(&mut self, player: PlayerId, room: &RoomId) {
            if let Some(members) = self.groups.get_mut(room) {
                members.remove(&player.0);
            }
        }

        fn broadcast(&self, room: &RoomId, event: &ServerEvent) {
            for member in self.groups.get(room).into_iter().flatten() {
                self.delivered.borrow_mut().push((*member, event.clone()));
            }
        }

        fn send_to(&self, player: PlayerId, event: ServerEvent) {
            self.delivered.borrow_mut().push((player.0, event));
        }
    }

    #[test]
    fn test_dispatch_applies_effects_in_order() {
        let room = RoomId::from("r");
        let mut inbox = Inbox::default();
        dispatch(
            vec![
                Effect::JoinGroup { player: PlayerId(1), room: room.clone() },
                Effect::Broadcast {
                    room: room.clone(),
                    event: ServerEvent::PlayerCount(1),
                },
                Effect::LeaveGroup { player: PlayerId(1), room: room.clone() },
                Effect::Broadcast { room, event: ServerEvent::PlayerCount(0) },
                Effect::SendTo {
                    player: PlayerId(2),
                    event: ServerEvent::PlayerCount(9),
                },
            ],
            &mut inbox,
        );

        assert_eq!(
            inbox.delivered.into_inner(),
            vec![
                (1, ServerEvent::PlayerCount(1)),
                (2, ServerEvent::PlayerCount(9)),
            ]
        );
    }
}
