//! Unified error type for the gridlock server.

use gridlock_transport::TransportError;

/// Errors that stop the server from starting or running.
///
/// Room refusals never surface here: they are answered on the ack
/// channel. Undecodable frames are logged and skipped per connection.
#[derive(Debug, thiserror::Error)]
pub enum GridlockError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
