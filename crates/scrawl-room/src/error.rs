//! Error types for the room layer.
//!
//! The `Display` text of a [`RoomError`] is shown to the player as-is, so
//! it is written for people, not logs. The room code stays available
//! through `Debug` and the variant fields.

use scrawl_protocol::RoomCode;

/// Broad category of a failure, shared by the room and game layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    PermissionDenied,
    CapacityExceeded,
    NameConflict,
}

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code.
    #[error("Room not found 😕")]
    NotFound(RoomCode),

    /// The room has left the lobby.
    #[error("Game already in progress ⏳")]
    AlreadyStarted(RoomCode),

    /// The room has reached its player limit.
    #[error("Room is full 😤")]
    RoomFull(RoomCode),

    /// Someone in the room already uses this name (case-sensitive).
    #[error("Name already taken 🙄")]
    NameTaken(String),

    /// The player is already seated somewhere.
    #[error("You are already in room {0}")]
    AlreadyInRoom(RoomCode),
}

impl RoomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyStarted(_) | Self::AlreadyInRoom(_) => {
                ErrorKind::InvalidState
            }
            Self::RoomFull(_) => ErrorKind::CapacityExceeded,
            Self::NameTaken(_) => ErrorKind::NameConflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_join_failure_is_distinct() {
        let code = RoomCode::new("K7QXM");
        let errors = [
            RoomError::NotFound(code.clone()),
            RoomError::AlreadyStarted(code.clone()),
            RoomError::RoomFull(code.clone()),
            RoomError::NameTaken("ann".into()),
        ];
        let kinds: Vec<_> = errors.iter().map(RoomError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::NotFound,
                ErrorKind::InvalidState,
                ErrorKind::CapacityExceeded,
                ErrorKind::NameConflict,
            ]
        );
        let messages: std::collections::HashSet<_> =
            errors.iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_already_in_room_names_the_room() {
        let err = RoomError::AlreadyInRoom(RoomCode::new("AB2CD"));
        assert!(err.to_string().contains("AB2CD"));
    }
}
