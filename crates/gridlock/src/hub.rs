//! Connection-backed broadcast groups.
//!
//! The hub maps each connected player to its outbound queue and each room
//! to the set of players subscribed to it. It is the [`GroupSink`] the
//! room registry's effects are dispatched to.

use std::collections::{HashMap, HashSet};

use gridlock_protocol::{PlayerId, RoomId, ServerEvent};
use gridlock_room::GroupSink;
use tokio::sync::mpsc::UnboundedSender;

/// Outbound queues and room subscriptions for every live connection.
#[derive(Debug, Default)]
pub struct GroupHub {
    peers: HashMap<PlayerId, UnboundedSender<ServerEvent>>,
    groups: HashMap<RoomId, HashSet<PlayerId>>,
}

impl GroupHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the outbound queue for a newly accepted connection.
    pub fn register(&mut self, player: PlayerId, tx: UnboundedSender<ServerEvent>) {
        self.peers.insert(player, tx);
    }

    /// Forgets a connection and drops it from every group.
    ///
    /// Dropping the sender ends the connection's writer task once the
    /// queue drains.
    pub fn unregister(&mut self, player: PlayerId) {
        self.peers.remove(&player);
        self.groups.retain(|_, members| {
            members.remove(&player);
            !members.is_empty()
        });
    }

    /// Number of registered connections.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Members of a room's group, if any.
    pub fn members(&self, room: &RoomId) -> Option<&HashSet<PlayerId>> {
        self.groups.get(room)
    }

    fn deliver(&self, player: PlayerId, event: ServerEvent) {
        let Some(tx) = self.peers.get(&player) else {
            tracing::trace!(%player, "no outbound queue, event dropped");
            return;
        };
        if tx.send(event).is_err() {
            tracing::trace!(%player, "outbound queue closed, event dropped");
        }
    }
}

impl GroupSink for GroupHub {
    fn join_group(&mut self, player: PlayerId, room: &RoomId) {
        self.groups.entry(room.clone()).or_default().insert(player);
    }

    fn leave_group(&mut self, player: PlayerId, room: &RoomId) {
        if let Some(members) = self.groups.get_mut(room) {
            members.remove(&player);
            if members.is_empty() {
                self.groups.remove(room);
            }
        }
    }

    fn broadcast(&self, room: &RoomId, event: &ServerEvent) {
        for member in self.groups.get(room).into_iter().flatten() {
            self.deliver(*member, event.clone());
        }
    }

    fn send_to(&self, player: PlayerId, event: ServerEvent) {
        self.deliver(player, event);
    }
}
