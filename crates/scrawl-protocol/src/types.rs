//! Game data that travels "on the wire".
//!
//! These are the structures embedded in [`ServerEvent`](crate::ServerEvent)s
//! and [`ClientCommand`](crate::ClientCommand)s. Field names are serialized
//! in camelCase because that is what the browser client reads.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// The server derives it from the transport connection id, so a player's
/// identity lives exactly as long as their connection.
///
/// `#[serde(transparent)]` serializes `PlayerId(42)` as plain `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The short code players type to join a room, e.g. `"K7QXM"`.
///
/// Codes are stored upper-case with surrounding whitespace removed, so a
/// player typing `" k7qxm"` still finds the room. The normalization runs
/// on construction *and* on deserialization (`from = "String"`).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Creates a normalized room code.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Room lifecycle and settings
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered:
///
/// ```text
/// Lobby → Playing → Revealing → Finished
/// ```
///
/// - **Lobby**: accepting joins, waiting for the host to start.
/// - **Playing**: steps are running; submissions are accepted.
/// - **Revealing**: every chain is complete and has been broadcast.
/// - **Finished**: reserved for clients that close the reveal screen. The
///   orchestrator never moves a room past `Revealing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Lobby,
    Playing,
    Revealing,
    Finished,
}

impl RoomState {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns the next state, or `None` from the terminal state.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Lobby => Some(Self::Playing),
            Self::Playing => Some(Self::Revealing),
            Self::Revealing => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Playing => write!(f, "playing"),
            Self::Revealing => write!(f, "revealing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Normalized room settings, as stored on a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettings {
    /// Seconds allowed for a drawing step.
    pub draw_time: u32,
    /// Seconds allowed for writing or guessing a phrase.
    pub guess_time: u32,
    /// Game mode name. Only `classic` has server-side behavior.
    pub mode: String,
    /// Whether drawing steps get a random modifier.
    pub modifiers: bool,
    pub max_players: usize,
    pub rounds: u32,
}

/// Settings as sent by the client when creating a room.
///
/// Every field is optional; the registry fills in defaults for missing,
/// zero, or empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsRequest {
    pub draw_time: Option<u32>,
    pub guess_time: Option<u32>,
    pub mode: Option<String>,
    pub modifiers: Option<bool>,
    pub max_players: Option<usize>,
    pub rounds: Option<u32>,
}

// ---------------------------------------------------------------------------
// Players and achievements
// ---------------------------------------------------------------------------

/// A player seated in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    /// Display name, unique within the room (case-sensitive).
    pub name: String,
    /// Avatar glyph (an emoji).
    pub avatar: String,
    /// Cumulative score across games played in this room.
    pub score: i64,
    pub achievements: Vec<Achievement>,
}

impl Player {
    /// Creates a player with a zero score and no achievements.
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            avatar: avatar.into(),
            score: 0,
            achievements: Vec::new(),
        }
    }
}

/// The two end-of-game awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    /// The last guess matched the original phrase word for word.
    Telepath,
    /// The chain drifted as far as possible from the original phrase.
    Destroyer,
}

/// An achievement credited to a player (by display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub player: String,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub icon: String,
    pub text: String,
}

/// Scores and achievements computed when a game ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResults {
    /// Points earned this game, keyed by player name.
    pub scores: BTreeMap<String, i64>,
    pub achievements: Vec<Achievement>,
}

// ---------------------------------------------------------------------------
// Steps and tasks
// ---------------------------------------------------------------------------

/// What a chain entry contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Phrase,
    Drawing,
}

/// What a player is asked to do during a game step.
///
/// The kind is a pure function of the step number; see [`TaskKind::for_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// Step 0: invent the opening phrase. Nothing is shown.
    WriteFirst,
    /// Even steps after 0: caption the drawing you are shown.
    Guess,
    /// Odd steps: draw the phrase you are shown.
    Draw,
}

impl TaskKind {
    /// Step 0 is `WriteFirst`, other even steps are `Guess`, odd steps are
    /// `Draw`.
    pub fn for_step(step: usize) -> Self {
        if step == 0 {
            Self::WriteFirst
        } else if step % 2 == 1 {
            Self::Draw
        } else {
            Self::Guess
        }
    }

    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Draw)
    }

    /// The kind of chain entry this task produces.
    pub fn step_kind(self) -> StepKind {
        if self.is_drawing() {
            StepKind::Drawing
        } else {
            StepKind::Phrase
        }
    }
}

/// One contribution appended to a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Phrase text, or an encoded image (data URL) for drawings. Opaque to
    /// the server.
    pub content: String,
    /// Author name, copied at submission time so it survives the author
    /// leaving.
    pub author: String,
    pub author_avatar: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// `true` when the server filled this step in because time ran out.
    #[serde(rename = "timeout", default)]
    pub timed_out: bool,
}

/// A constraint applied to a drawing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    /// The only colour allowed (`one-color`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The per-player assignment sent at the start of every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub step: usize,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Seconds the player has for this task.
    pub time_limit: u32,
    pub chain_index: usize,
    pub modifier: Option<Modifier>,
    /// The phrase to illustrate (draw tasks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
    /// The drawing to caption (guess tasks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

// ---------------------------------------------------------------------------
// Chains
// ---------------------------------------------------------------------------

/// Identifies one chain entry for reactions.
///
/// Serialized as the string `"<chain>-<step>"` so it can be used as a JSON
/// object key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct ReactionKey {
    pub chain_index: usize,
    pub step_index: usize,
}

impl ReactionKey {
    pub fn new(chain_index: usize, step_index: usize) -> Self {
        Self {
            chain_index,
            step_index,
        }
    }
}

impl fmt::Display for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.chain_index, self.step_index)
    }
}

impl From<ReactionKey> for String {
    fn from(key: ReactionKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ReactionKey {
    type Error = ProtocolError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let invalid =
            || ProtocolError::InvalidMessage(format!("bad reaction key {raw:?}"));
        let (chain, step) = raw.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            chain_index: chain.parse().map_err(|_| invalid())?,
            step_index: step.parse().map_err(|_| invalid())?,
        })
    }
}

/// One rotating thread of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// Equal to the starting slot of the player who opened the chain.
    pub id: usize,
    pub started_by: String,
    pub steps: Vec<Step>,
    pub reactions: BTreeMap<ReactionKey, BTreeMap<String, u32>>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new(id: usize, started_by: impl Into<String>) -> Self {
        Self {
            id,
            started_by: started_by.into(),
            steps: Vec::new(),
            reactions: BTreeMap::new(),
        }
    }
}

/// A finished chain kept in the room's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    #[serde(flatten)]
    pub chain: Chain,
    /// When the game that produced this chain ended.
    pub date: DateTime<Utc>,
    pub votes: u32,
}

/// A snapshot of a room sent on create and join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub id: RoomCode,
    pub host_id: PlayerId,
    pub players: Vec<Player>,
    pub settings: RoomSettings,
    pub state: RoomState,
    pub gallery: Vec<GalleryEntry>,
}
