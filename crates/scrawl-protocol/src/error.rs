//! Errors from turning frames into commands and events into frames.

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// An outgoing event could not be serialized.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A frame from a player was not a command we understand: bad JSON,
    /// an unknown `type`, or missing fields.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// Parsed fine but breaks a wire rule, e.g. a reaction key that is
    /// not `"<chain>-<step>"`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
