//! # scrawl
//!
//! Server for a draw-and-guess chain party game. Players write a phrase,
//! the next player draws it, the next guesses the drawing, and so on
//! around the table until every chain is as long as the room is big.
//!
//! This crate wires the layers together:
//!
//! ```text
//! WebSocket (scrawl-transport) → JSON (scrawl-protocol) → hub task
//!     → Orchestrator (scrawl-game) → RoomRegistry (scrawl-room)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrawl::prelude::*;
//!
//! # async fn start() -> Result<(), ScrawlError> {
//! let config = ServerConfig::from_env()?;
//! let server = ScrawlServerBuilder::from_config(config).build().await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod hub;
mod server;

pub use config::{DEFAULT_BIND_ADDR, ServerConfig};
pub use error::ScrawlError;
pub use server::{ScrawlServer, ScrawlServerBuilder};

/// Re-exports for running and talking to a server.
pub mod prelude {
    pub use crate::{ScrawlError, ScrawlServer, ScrawlServerBuilder, ServerConfig};

    pub use scrawl_game::OrchestratorConfig;
    pub use scrawl_protocol::{
        ClientCommand, Codec, JsonCodec, PlayerId, RoomCode, RoomView, ServerEvent,
        SettingsRequest, Task, TaskKind,
    };
    pub use scrawl_room::{ErrorKind, RoomError};
}
