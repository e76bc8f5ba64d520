//! Wire protocol for scrawl.
//!
//! This crate defines the "language" the browser client and the server
//! speak:
//!
//! - **Types** ([`Player`], [`Chain`], [`Step`], [`Task`], etc.) are the
//!   game data that travels inside events.
//! - **Messages** ([`ClientCommand`], [`ServerEvent`], [`Recipient`]) are
//!   the inbound commands and outbound events themselves.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) define how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) describe what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw frames) and the
//! game orchestrator. It knows nothing about connections, rooms, or
//! timers, only how messages look on the wire.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientCommand) → Orchestrator
//! Orchestrator → (Recipient, ServerEvent) → Protocol (bytes) → Transport
//! ```

mod codec;
mod error;
mod messages;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{ClientCommand, Recipient, ServerEvent};
pub use types::{
    Achievement, AchievementKind, Chain, GalleryEntry, GameResults, Modifier,
    Player, PlayerId, ReactionKey, RoomCode, RoomSettings, RoomState,
    RoomView, SettingsRequest, Step, StepKind, Task, TaskKind,
};
