//! Per-connection handler: outbound queue, request loop, and cleanup.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound queue in the hub and spawn its writer task
//!   2. Loop: receive frames → decode `Request` → apply to the registry
//!   3. On close or error, drop the connection from every room

use std::sync::Arc;

use gridlock_protocol::{Codec, PlayerId, Request, ServerEvent};
use gridlock_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::server::ServerState;

/// Drop guard that removes a player from every room when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async locks.
struct DisconnectGuard<C: Codec> {
    player: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let player = self.player;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.disconnect(player).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) {
    let conn = Arc::new(conn);
    let player = PlayerId(conn.id().into_inner());
    tracing::info!(%player, "client connected");

    let (tx, rx) = mpsc::unbounded_channel();
    state.hub.lock().await.register(player, tx);
    let _guard = DisconnectGuard {
        player,
        state: Arc::clone(&state),
    };
    tokio::spawn(write_loop(Arc::clone(&conn), rx, Arc::clone(&state)));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player, "client disconnected");
                break;
            }
            Err(e) => {
                tracing::debug!(%player, error = %e, "recv error");
                break;
            }
        };

        let request: Request = match state.codec.decode(&data) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(%player, error = %e, "failed to decode request");
                continue;
            }
        };

        state.apply(player, request).await;
    }

    // _guard drops here → disconnect fires.
}

/// Drains the connection's outbound queue onto the socket.
///
/// Ends when the hub drops the sender or the socket stops accepting
/// writes.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut rx: UnboundedReceiver<ServerEvent>,
    state: Arc<ServerState<C>>,
) {
    while let Some(event) = rx.recv().await {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn = %conn.id(), error = %e, "send failed");
            break;
        }
    }
}
