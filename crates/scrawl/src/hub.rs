//! The hub: the one task that owns all game state.
//!
//! Connection handlers and room timers only send messages here. The hub
//! feeds each one to the [`Orchestrator`] in arrival order and routes the
//! resulting events to per-player outboxes, so game state is never shared
//! between tasks.

use std::collections::HashMap;
use std::sync::Arc;

use scrawl_game::{Command, Orchestrator, OrchestratorConfig, Outbound};
use scrawl_protocol::{Codec, PlayerId, Recipient, RoomCode};
use scrawl_tick::TimerEvent;
use tokio::sync::mpsc;

/// Encoded event bytes, shared by every recipient of a broadcast.
pub(crate) type Frame = Arc<[u8]>;

/// A message from a connection handler to the hub.
#[derive(Debug)]
pub(crate) enum Inbound {
    /// A player connected; events for them go to `outbox`.
    Connected {
        player: PlayerId,
        outbox: mpsc::UnboundedSender<Frame>,
    },
    /// Anything for the orchestrator, including the player's disconnect.
    Command(Command),
}

pub(crate) struct Hub<C: Codec> {
    orchestrator: Orchestrator,
    outboxes: HashMap<PlayerId, mpsc::UnboundedSender<Frame>>,
    inbox: mpsc::UnboundedReceiver<Inbound>,
    timers: mpsc::UnboundedReceiver<TimerEvent<RoomCode>>,
    codec: C,
}

impl<C: Codec> Hub<C> {
    /// Creates a hub and the sender connection handlers use to reach it.
    pub(crate) fn new(
        config: OrchestratorConfig,
        seed: Option<u64>,
        codec: C,
    ) -> (Self, mpsc::UnboundedSender<Inbound>) {
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        let (timer_tx, timers) = mpsc::unbounded_channel();

        let mut orchestrator = Orchestrator::new(timer_tx, config);
        if let Some(seed) = seed {
            orchestrator = orchestrator.seeded(seed);
        }

        let hub = Self {
            orchestrator,
            outboxes: HashMap::new(),
            inbox,
            timers,
            codec,
        };
        (hub, inbox_tx)
    }

    /// Processes messages until every handler sender is dropped.
    pub(crate) async fn run(mut self) {
        tracing::debug!("hub running");
        loop {
            let command = tokio::select! {
                inbound = self.inbox.recv() => match inbound {
                    Some(Inbound::Connected { player, outbox }) => {
                        self.outboxes.insert(player, outbox);
                        continue;
                    }
                    Some(Inbound::Command(command)) => command,
                    None => break,
                },
                Some(event) = self.timers.recv() => Command::Timer(event),
            };
            self.dispatch(command);
        }
        tracing::debug!("hub stopped");
    }

    fn dispatch(&mut self, command: Command) {
        let departed = match &command {
            Command::Disconnect { player } => Some(*player),
            _ => None,
        };

        let outbound = self.orchestrator.handle(command);
        self.deliver(outbound);

        if let Some(player) = departed {
            self.outboxes.remove(&player);
        }
    }

    /// Encodes each event once and queues it for its recipients.
    ///
    /// Room membership is read after the command ran, so a player who
    /// just left gets nothing addressed to their old room.
    fn deliver(&mut self, outbound: Outbound) {
        for (recipient, event) in outbound {
            let frame: Frame = match self.codec.encode_event(&event) {
                Ok(bytes) => bytes.into(),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode event");
                    continue;
                }
            };

            match recipient {
                Recipient::Player(player) => self.send_to(player, &frame),
                Recipient::Room(code) => {
                    for player in self.orchestrator.room_members(&code) {
                        self.send_to(player, &frame);
                    }
                }
            }
        }
    }

    fn send_to(&mut self, player: PlayerId, frame: &Frame) {
        let Some(outbox) = self.outboxes.get(&player) else {
            tracing::debug!(player_id = %player, "no outbox for player");
            return;
        };
        if outbox.send(Arc::clone(frame)).is_err() {
            tracing::debug!(player_id = %player, "outbox closed");
            self.outboxes.remove(&player);
        }
    }
}
