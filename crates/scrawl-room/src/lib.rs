//! Room and player registry for scrawl.
//!
//! The registry is a plain owned data structure: it creates rooms with
//! fresh codes, seats players, and tears rooms down when the last player
//! leaves. It never runs timers or sends messages; the game orchestrator
//! drives it and reports what changed.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: every live room plus the player → room index
//! - [`Room`]: one room's players, settings, chains, and gallery
//! - [`RoomError`]: why a join was refused
//! - [`normalize_settings`]: fills in defaults for client settings

mod config;
mod error;
mod generate;
mod registry;
mod room;

pub use config::{
    DEFAULT_DRAW_TIME, DEFAULT_GUESS_TIME, DEFAULT_MAX_PLAYERS, DEFAULT_MODE,
    DEFAULT_ROUNDS, default_settings, normalize_settings,
};
pub use error::{ErrorKind, RoomError};
pub use generate::{AVATARS, CODE_ALPHABET, CODE_LEN, generate_code, random_avatar};
pub use registry::RoomRegistry;
pub use room::Room;
