//! Top-level error type for the scrawl server.

use scrawl_protocol::ProtocolError;
use scrawl_transport::TransportError;

/// Error that wraps the crate-specific errors the server can hit.
///
/// Room and game errors never get this far: the orchestrator turns them
/// into `error-message` events or logs them.
#[derive(Debug, thiserror::Error)]
pub enum ScrawlError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The hub task is gone, so nothing can be processed.
    #[error("server is shutting down")]
    Shutdown,
}
