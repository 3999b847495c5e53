//! # Gridlock
//!
//! Two-player tic-tac-toe rooms over WebSocket.
//!
//! Clients create or join a room by id, take turns placing marks, and
//! every participant receives the resulting state as it changes. The
//! server is authoritative: it validates moves, detects wins and draws,
//! and cleans up rooms when players leave or drop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridlock::prelude::*;
//!
//! # async fn start() -> Result<(), GridlockError> {
//! let config = ServerConfig::load()?;
//! let server = GridlockServerBuilder::from_config(&config).build().await?;
//! server.run_until_shutdown(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await
//! # }
//! ```

pub mod config;
mod error;
mod handler;
pub mod hub;
mod server;

pub use error::GridlockError;
pub use server::{GridlockServer, GridlockServerBuilder};

/// Re-exports of the types most users need.
pub mod prelude {
    pub use crate::config::ServerConfig;
    pub use crate::{GridlockError, GridlockServer, GridlockServerBuilder};

    pub use gridlock_protocol::{
        AckResult, ClientEvent, Codec, GameResult, JsonCodec, Mark,
        MoveRequest, Notice, PlayerId, Request, RoomId, RoomSnapshot,
        ServerEvent,
    };
    pub use gridlock_room::{
        Effect, GroupSink, RoomError, RoomPhase, RoomRegistry,
    };
}
