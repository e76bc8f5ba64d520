//! Everything the orchestrator reacts to.

use scrawl_protocol::{ClientCommand, PlayerId, Recipient, RoomCode, ServerEvent};
use scrawl_tick::TimerEvent;

/// One input to [`Orchestrator::handle`](crate::Orchestrator::handle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A decoded message from a connected player.
    Client {
        player: PlayerId,
        command: ClientCommand,
    },
    /// The player's connection closed.
    Disconnect { player: PlayerId },
    /// A room timer ticked, expired, or fired.
    Timer(TimerEvent<RoomCode>),
}

/// Events to deliver, in order.
pub type Outbound = Vec<(Recipient, ServerEvent)>;
