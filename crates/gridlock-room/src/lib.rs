//! Room registry and game session state machine for gridlock.
//!
//! Rooms are plain data owned by a [`RoomRegistry`]. Every operation is
//! synchronous and returns the [`Effect`]s it causes (group membership
//! changes, broadcasts, acknowledgments) instead of performing I/O, so
//! the whole game can be driven and inspected without a network.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates/deletes rooms, applies client events
//! - [`Room`]: seats, board, turn, and move application
//! - [`Effect`] / [`GroupSink`]: outbound effects and the capability
//!   that delivers them
//! - [`RoomPhase`]: derived lifecycle phase
//! - [`check_winner`]: win detection over the eight lines

mod board;
mod effect;
mod error;
mod phase;
mod registry;
mod room;

pub use board::{WINNING_LINES, check_winner, is_full};
pub use effect::{Effect, GroupSink, dispatch};
pub use error::RoomError;
pub use phase::RoomPhase;
pub use registry::{Outcome, RoomRegistry};
pub use room::{MAX_PLAYERS, MoveOutcome, MoveRejection, Room};
