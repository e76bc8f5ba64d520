//! Error types for the game layer.

use scrawl_protocol::RoomCode;
use scrawl_room::{ErrorKind, RoomError};

/// Errors raised while starting or running a game.
///
/// `NotHost` and `NotEnoughPlayers` are shown to the player; the rest are
/// logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error("Only the host can start the game")]
    NotHost,

    /// Fewer seats than the minimum needed for a game.
    #[error("Need at least {0} players")]
    NotEnoughPlayers(usize),

    /// The room is not in the lifecycle state the operation needs.
    #[error("room {0} cannot do that right now")]
    InvalidState(RoomCode),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Room(err) => err.kind(),
            Self::NotHost => ErrorKind::PermissionDenied,
            Self::NotEnoughPlayers(_) | Self::InvalidState(_) => {
                ErrorKind::InvalidState
            }
        }
    }

    /// Whether the player should see this error.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::NotHost | Self::NotEnoughPlayers(_))
    }
}
