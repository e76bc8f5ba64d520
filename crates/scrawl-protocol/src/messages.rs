//! Inbound commands, outbound events, and their addressing.
//!
//! Every frame is a JSON object whose `type` field names the message in
//! kebab-case, e.g. `{"type":"submit-phrase","roomId":"K7QXM","phrase":"…"}`.
//! Field names are camelCase.

use serde::{Deserialize, Serialize};

use crate::types::{
    Achievement, Chain, GameResults, Player, PlayerId, RoomCode,
    SettingsRequest, RoomView, Task,
};

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive a [`ServerEvent`].
///
/// The orchestrator returns `(Recipient, ServerEvent)` pairs and the
/// server resolves them into connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// Every player currently in the room.
    Room(RoomCode),
    /// One player.
    Player(PlayerId),
}

// ---------------------------------------------------------------------------
// ClientCommand
// ---------------------------------------------------------------------------

/// A message sent by the browser client.
///
/// Disconnects are not a client command: the server notices the closed
/// socket itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientCommand {
    /// Open a new room with the sender as host.
    CreateRoom {
        player_name: String,
        #[serde(default)]
        settings: Option<SettingsRequest>,
    },

    /// Join an existing room in the lobby.
    JoinRoom {
        room_id: RoomCode,
        player_name: String,
    },

    /// Host only: start the game.
    StartGame { room_id: RoomCode },

    /// Answer a `write-first` or `guess` task.
    SubmitPhrase { room_id: RoomCode, phrase: String },

    /// Answer a `draw` task. The payload is an opaque encoded image.
    SubmitDrawing { room_id: RoomCode, image_data: String },

    /// React to a chain entry during the reveal.
    SubmitReaction {
        room_id: RoomCode,
        chain_index: usize,
        step_index: usize,
        emoji: String,
    },
}

impl ClientCommand {
    /// Returns the room this command targets, if any.
    pub fn room_id(&self) -> Option<&RoomCode> {
        match self {
            Self::CreateRoom { .. } => None,
            Self::JoinRoom { room_id, .. }
            | Self::StartGame { room_id }
            | Self::SubmitPhrase { room_id, .. }
            | Self::SubmitDrawing { room_id, .. }
            | Self::SubmitReaction { room_id, .. } => Some(room_id),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerEvent
// ---------------------------------------------------------------------------

/// A message sent by the server.
///
/// Payloads whose own fields include a `type` (the task, the room view)
/// are nested under a named field so they never collide with the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Unicast to the creator.
    RoomCreated { room: RoomView },

    /// Unicast to the player who just joined.
    RoomJoined { room: RoomView },

    /// Broadcast to the room after a successful join. `new_player` is the
    /// newcomer's display name.
    PlayerJoined {
        players: Vec<Player>,
        new_player: String,
    },

    /// Broadcast to the remaining members after a leave or disconnect.
    PlayerLeft {
        players: Vec<Player>,
        left_player_id: PlayerId,
    },

    GameStarted {
        total_steps: usize,
        mode: String,
        modifiers: bool,
    },

    /// Unicast: what this player must do for the current step.
    NewTask { task: Task },

    /// Seconds left in the current step, once per second.
    TimerTick { remaining: u32 },

    SubmissionProgress { submitted: usize, total: usize },

    /// The step is over; the next one starts after a short pause.
    StepTransition {
        next_step: usize,
        total_steps: usize,
    },

    GameEnded {
        chains: Vec<Chain>,
        results: GameResults,
        achievements: Vec<Achievement>,
    },

    ReactionAdded {
        chain_index: usize,
        step_index: usize,
        emoji: String,
    },

    /// A user-facing error, unicast to the offending player.
    ErrorMessage { message: String },
}

impl ServerEvent {
    /// Shorthand for an [`ServerEvent::ErrorMessage`].
    pub fn error(message: impl Into<String>) -> Self {
        Self::ErrorMessage {
            message: message.into(),
        }
    }
}
