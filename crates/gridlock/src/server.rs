//! `GridlockServer` builder and server loop.
//!
//! This is the entry point for running a gridlock server. It ties
//! together the layers: transport → protocol → room registry → hub.

use std::future::Future;
use std::sync::Arc;

use gridlock_protocol::{Codec, JsonCodec, PlayerId, Request};
use gridlock_room::{RoomRegistry, dispatch};
use gridlock_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::GridlockError;
use crate::config::ServerConfig;
use crate::handler::handle_connection;
use crate::hub::GroupHub;

/// Shared server state passed to each connection handler task.
///
/// Lock order is always `rooms` then `hub`. Effects are dispatched while
/// the registry lock is still held, so every client sees broadcasts in
/// the order the events were applied.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) hub: Mutex<GroupHub>,
    pub(crate) codec: C,
}

impl<C: Codec> ServerState<C> {
    fn new(codec: C) -> Self {
        Self {
            rooms: Mutex::new(RoomRegistry::new()),
            hub: Mutex::new(GroupHub::new()),
            codec,
        }
    }

    /// Applies one request to completion and delivers its effects.
    pub(crate) async fn apply(&self, player: PlayerId, request: Request) {
        let mut rooms = self.rooms.lock().await;
        let effects = rooms.handle(player, request);
        let mut hub = self.hub.lock().await;
        dispatch(effects, &mut *hub);
    }

    /// Removes a dropped connection from all rooms and from the hub.
    pub(crate) async fn disconnect(&self, player: PlayerId) {
        let mut rooms = self.rooms.lock().await;
        let outcome = rooms.disconnect_all(player);
        let mut hub = self.hub.lock().await;
        dispatch(outcome.effects, &mut *hub);
        hub.unregister(player);
    }
}

/// Builder for configuring and starting a gridlock server.
///
/// # Example
///
/// ```rust,no_run
/// use gridlock::prelude::*;
///
/// # async fn start() -> Result<(), GridlockError> {
/// let server = GridlockServer::builder()
///     .bind("127.0.0.1:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GridlockServerBuilder {
    bind_addr: String,
}

impl GridlockServerBuilder {
    /// Creates a new builder listening on `0.0.0.0:3000`.
    pub fn new() -> Self {
        Self::from_config(&ServerConfig::default())
    }

    /// Creates a builder from loaded configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bind_addr: config.bind_addr(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and returns a server ready to run.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<GridlockServer<JsonCodec>, GridlockError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState::new(JsonCodec));
        Ok(GridlockServer { transport, state })
    }
}

impl Default for GridlockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound gridlock server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridlockServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GridlockServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GridlockServerBuilder {
        GridlockServerBuilder::new()
    }
}

impl<C: Codec> GridlockServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), GridlockError> {
        self.run_until_shutdown(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` resolves.
    ///
    /// Connections already accepted keep their handler tasks; only new
    /// accepts stop.
    pub async fn run_until_shutdown<F>(
        mut self,
        shutdown: F,
    ) -> Result<(), GridlockError>
    where
        F: Future<Output = ()>,
    {
        if let Ok(addr) = self.local_addr() {
            tracing::info!(%addr, "gridlock server running");
        }
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested, no longer accepting");
                    return Ok(());
                }
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(handle_connection(conn, state));
                    }
                    // Per-socket failures are handled by the transport; an
                    // error here means the listener itself is gone.
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                        return Err(e.into());
                    }
                },
            }
        }
    }
}
