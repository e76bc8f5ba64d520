//! Turn orchestration for scrawl.
//!
//! The [`Orchestrator`] walks every room through a game: it snapshots the
//! seats, hands each player a task per step, collects submissions, fills
//! in placeholders when time runs out, and scores the chains at the end.
//!
//! It is a synchronous state machine. Callers feed it [`Command`]s one at
//! a time and deliver the `(Recipient, ServerEvent)` pairs it returns.
//! Timers run as Tokio tasks that report back through the channel given
//! to [`Orchestrator::new`]; those reports re-enter as
//! [`Command::Timer`].
//!
//! ```text
//! lobby --start (host, ≥3 players)--> playing --last step--> revealing
//! ```

mod clock;
mod command;
mod error;
mod modifiers;
mod orchestrator;
mod round;
mod scoring;

pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{Command, Outbound};
pub use error::GameError;
pub use modifiers::{MODIFIER_IDS, PALETTE, catalog, plan_modifiers};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use round::{Phase, Round, Seat};
pub use scoring::{
    DESTROYER_THRESHOLD, TELEPATH_BONUS, normalize_phrase, score_chains,
    similarity,
};
