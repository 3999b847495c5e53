//! Wire protocol for gridlock.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`Request`], [`ClientEvent`], [`ServerEvent`],
//!   [`RoomSnapshot`], ...): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those structures
//!   become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong doing so.
//!
//! It knows nothing about connections or room rules.
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Room registry (state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AckResult, BOARD_SIZE, Board, ClientEvent, GameResult, Mark, MoveRequest,
    Notice, PlayerId, Request, RoomId, RoomSnapshot, ServerEvent,
};
