use std::io;

/// What went wrong while moving frames between a player and the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listening socket could not be opened.
    #[error("bind failed: {0}")]
    Bind(#[source] io::Error),

    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    /// The TCP connection came in but the WebSocket upgrade failed.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// The peer is gone; nothing more can be sent on this connection.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    #[error("send failed: {0}")]
    SendFailed(#[source] io::Error),

    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] io::Error),

    /// The peer sent a message over the size cap. Drawings are the usual
    /// culprit.
    #[error("message too large: {0}")]
    MessageTooLarge(String),
}

impl TransportError {
    /// Whether the error just means the player went away.
    pub fn is_disconnect(&self) -> bool {
        match self {
            Self::ConnectionClosed(_) => true,
            Self::SendFailed(e) | Self::ReceiveFailed(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnects_are_recognised() {
        assert!(TransportError::ConnectionClosed("bye".into()).is_disconnect());
        assert!(
            TransportError::ReceiveFailed(io::Error::from(io::ErrorKind::ConnectionReset))
                .is_disconnect()
        );
        assert!(!TransportError::MessageTooLarge("6 MB".into()).is_disconnect());
        assert!(!TransportError::Bind(io::Error::from(io::ErrorKind::AddrInUse)).is_disconnect());
    }
}
