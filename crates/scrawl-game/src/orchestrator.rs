//! The turn orchestrator.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use scrawl_protocol::{
    Chain, ClientCommand, GalleryEntry, PlayerId, ReactionKey, Recipient,
    RoomCode, RoomState, ServerEvent, SettingsRequest, Step, StepKind, Task,
    TaskKind,
};
use scrawl_room::{Room, RoomRegistry};
use scrawl_tick::{TimerEvent, TimerKind, TimerSlots};

use crate::{
    Clock, Command, GameError, Outbound, Phase, Round, Seat, SystemClock,
    plan_modifiers, score_chains,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Seats needed to start a game.
    pub min_players: usize,
    /// Pause between the end of one step and the start of the next.
    pub reveal_pause: Duration,
    /// Filled in for a phrase step a player missed.
    pub timeout_phrase: String,
    /// Filled in for a drawing step a player missed.
    pub timeout_drawing: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            min_players: 3,
            reveal_pause: Duration::from_secs(3),
            timeout_phrase: "(ran out of time 😅)".to_string(),
            timeout_drawing: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Owns the registry, the running games, and their timers.
///
/// Every method runs to completion without awaiting, so a single task can
/// own the orchestrator and process commands strictly in order.
pub struct Orchestrator<C: Clock = SystemClock> {
    registry: RoomRegistry,
    rounds: HashMap<RoomCode, Round>,
    timers: TimerSlots<RoomCode>,
    config: OrchestratorConfig,
    clock: C,
    rng: StdRng,
}

impl Orchestrator<SystemClock> {
    /// Creates an orchestrator whose timers report into `timer_tx`.
    ///
    /// Feed whatever arrives on the matching receiver back in as
    /// [`Command::Timer`].
    pub fn new(
        timer_tx: mpsc::UnboundedSender<TimerEvent<RoomCode>>,
        config: OrchestratorConfig,
    ) -> Self {
        Self::with_clock(timer_tx, config, SystemClock)
    }
}

impl<C: Clock> Orchestrator<C> {
    pub fn with_clock(
        timer_tx: mpsc::UnboundedSender<TimerEvent<RoomCode>>,
        config: OrchestratorConfig,
        clock: C,
    ) -> Self {
        Self {
            registry: RoomRegistry::new(),
            rounds: HashMap::new(),
            timers: TimerSlots::new(timer_tx),
            config,
            clock,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Makes room codes, avatars, and modifier plans reproducible.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.registry = RoomRegistry::with_seed(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// The running game in a room, if any.
    pub fn round(&self, code: &RoomCode) -> Option<&Round> {
        self.rounds.get(code)
    }

    /// Whether a room has a countdown or delay pending.
    pub fn has_timer(&self, code: &RoomCode) -> bool {
        self.timers.contains(code)
    }

    /// Current members of a room, for resolving [`Recipient::Room`].
    pub fn room_members(&self, code: &RoomCode) -> Vec<PlayerId> {
        self.registry.members(code)
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Processes one command and returns the events it produced.
    pub fn handle(&mut self, command: Command) -> Outbound {
        match command {
            Command::Client { player, command } => match command {
                ClientCommand::CreateRoom {
                    player_name,
                    settings,
                } => self.create_room(player, player_name, settings.unwrap_or_default()),
                ClientCommand::JoinRoom {
                    room_id,
                    player_name,
                } => self.join_room(player, &room_id, player_name),
                ClientCommand::StartGame { room_id } => {
                    self.request_start(player, &room_id)
                }
                ClientCommand::SubmitPhrase { room_id, phrase } => {
                    self.submit_phrase(player, &room_id, phrase)
                }
                ClientCommand::SubmitDrawing {
                    room_id,
                    image_data,
                } => self.submit_drawing(player, &room_id, image_data),
                ClientCommand::SubmitReaction {
                    room_id,
                    chain_index,
                    step_index,
                    emoji,
                } => self.react(player, &room_id, chain_index, step_index, emoji),
            },
            Command::Disconnect { player } => self.leave(player),
            Command::Timer(event) => self.on_timer(event),
        }
    }

    fn create_room(
        &mut self,
        player: PlayerId,
        name: String,
        settings: SettingsRequest,
    ) -> Outbound {
        let mut out = if self.registry.room_by_player(player).is_some() {
            self.leave(player)
        } else {
            Vec::new()
        };
        let room = self.registry.create_room(player, name, settings);
        out.push((
            Recipient::Player(player),
            ServerEvent::RoomCreated { room: room.view() },
        ));
        out
    }

    fn join_room(
        &mut self,
        player: PlayerId,
        code: &RoomCode,
        name: String,
    ) -> Outbound {
        match self.registry.join_room(code, player, name.clone()) {
            Ok(room) => vec![
                (
                    Recipient::Player(player),
                    ServerEvent::RoomJoined { room: room.view() },
                ),
                (
                    Recipient::Room(code.clone()),
                    ServerEvent::PlayerJoined {
                        players: room.players.clone(),
                        new_player: name,
                    },
                ),
            ],
            Err(err) => {
                debug!(room = %code, player_id = %player, error = ?err, "join refused");
                vec![(Recipient::Player(player), ServerEvent::error(err.to_string()))]
            }
        }
    }

    /// Checks whether `player` may start the game in `code`.
    ///
    /// The order matters: a missing or already started room is reported
    /// before permission or head count.
    pub fn check_start(&self, player: PlayerId, code: &RoomCode) -> Result<(), GameError> {
        let room = self.room(code)?;
        if room.state != RoomState::Lobby {
            return Err(GameError::InvalidState(code.clone()));
        }
        if !room.is_host(player) {
            return Err(GameError::NotHost);
        }
        if room.player_count() < self.config.min_players {
            return Err(GameError::NotEnoughPlayers(self.config.min_players));
        }
        Ok(())
    }

    fn request_start(&mut self, player: PlayerId, code: &RoomCode) -> Outbound {
        let result = self
            .check_start(player, code)
            .and_then(|()| self.start_game(code));
        match result {
            Ok(out) => out,
            Err(err) if err.is_user_facing() => {
                vec![(Recipient::Player(player), ServerEvent::error(err.to_string()))]
            }
            Err(err) => {
                debug!(room = %code, player_id = %player, error = %err, "start ignored");
                Vec::new()
            }
        }
    }

    fn react(
        &mut self,
        player: PlayerId,
        code: &RoomCode,
        chain_index: usize,
        step_index: usize,
        emoji: String,
    ) -> Outbound {
        let is_member = self
            .registry
            .get_room(code)
            .is_some_and(|room| room.has_player(player));
        if !is_member {
            debug!(room = %code, player_id = %player, "reaction from outsider ignored");
            return Vec::new();
        }
        if !self.add_reaction(code, chain_index, step_index, emoji.clone()) {
            return Vec::new();
        }
        vec![(
            Recipient::Room(code.clone()),
            ServerEvent::ReactionAdded {
                chain_index,
                step_index,
                emoji,
            },
        )]
    }

    fn on_timer(&mut self, event: TimerEvent<RoomCode>) -> Outbound {
        let TimerEvent {
            key: code,
            generation,
            kind,
        } = event;
        if !self.timers.is_current(&code, generation) {
            debug!(room = %code, generation, "stale timer event dropped");
            return Vec::new();
        }
        match kind {
            TimerKind::Tick { remaining } => vec![(
                Recipient::Room(code),
                ServerEvent::TimerTick { remaining },
            )],
            TimerKind::Expired => {
                self.timers.cancel(&code);
                info!(room = %code, "step timed out");
                self.fill_and_advance(&code)
            }
            TimerKind::Fired => {
                self.timers.cancel(&code);
                self.start_step(&code)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Game operations
    // -----------------------------------------------------------------------

    /// Starts a game: one chain per player, step 0, optional modifier plan.
    ///
    /// Does not check who asked or how many are seated; requests from
    /// players go through [`check_start`](Self::check_start) first.
    ///
    /// # Errors
    /// `Room(NotFound)` for an unknown room and `InvalidState` outside the
    /// lobby.
    pub fn start_game(&mut self, code: &RoomCode) -> Result<Outbound, GameError> {
        let room = self.room_mut(code)?;
        if !room.advance_to(RoomState::Playing) {
            return Err(GameError::InvalidState(code.clone()));
        }

        let seats: Vec<Seat> = room.players.iter().map(Seat::from).collect();
        room.chains = seats
            .iter()
            .enumerate()
            .map(|(i, seat)| Chain::new(i, seat.name.clone()))
            .collect();
        let modifiers = room.settings.modifiers;
        let mode = room.settings.mode.clone();
        let total_steps = seats.len();

        let plan = modifiers.then(|| plan_modifiers(total_steps, &mut self.rng));
        self.rounds.insert(code.clone(), Round::new(seats, plan));

        info!(room = %code, players = total_steps, modifiers, "game started");

        let mut out = vec![(
            Recipient::Room(code.clone()),
            ServerEvent::GameStarted {
                total_steps,
                mode,
                modifiers,
            },
        )];
        out.extend(self.start_step(code));
        Ok(out)
    }

    /// Opens the current step: sends each present seat its task and
    /// starts the room countdown.
    pub fn start_step(&mut self, code: &RoomCode) -> Outbound {
        let (Some(room), Some(round)) =
            (self.registry.get_room(code), self.rounds.get_mut(code))
        else {
            debug!(room = %code, "start_step on a room with no game");
            return Vec::new();
        };
        if room.state != RoomState::Playing {
            return Vec::new();
        }

        round.begin_step();
        let kind = round.task_kind();
        let time_limit = round.time_limit(&room.settings);
        let modifier = round.modifier().cloned();

        let mut out = Vec::with_capacity(round.seats.len());
        for (seat, occupant) in round.seats.iter().enumerate() {
            if !room.has_player(occupant.player_id) {
                continue;
            }
            let chain_index = round.chain_for(seat);
            let previous = (round.step > 0)
                .then(|| room.chains.get(chain_index))
                .flatten()
                .and_then(|chain| chain.steps.last())
                .map(|step| step.content.clone());
            let (phrase, image_data) = match kind {
                TaskKind::WriteFirst => (None, None),
                TaskKind::Draw => (previous, None),
                TaskKind::Guess => (None, previous),
            };
            out.push((
                Recipient::Player(occupant.player_id),
                ServerEvent::NewTask {
                    task: Task {
                        step: round.step,
                        kind,
                        time_limit,
                        chain_index,
                        modifier: modifier.clone(),
                        phrase,
                        image_data,
                    },
                },
            ));
        }

        debug!(room = %code, step = round.step, ?kind, time_limit, "step started");
        self.timers.start_countdown(code.clone(), time_limit);
        out
    }

    /// Records a phrase for a `write-first` or `guess` step.
    pub fn submit_phrase(
        &mut self,
        player: PlayerId,
        code: &RoomCode,
        phrase: String,
    ) -> Outbound {
        self.submit(player, code, StepKind::Phrase, phrase)
    }

    /// Records a drawing for a `draw` step.
    pub fn submit_drawing(
        &mut self,
        player: PlayerId,
        code: &RoomCode,
        image_data: String,
    ) -> Outbound {
        self.submit(player, code, StepKind::Drawing, image_data)
    }

    /// Appends a submission to the player's current chain.
    ///
    /// Silently ignored when the room is not playing, the step is not
    /// collecting, the player holds no seat, the seat already submitted,
    /// or `kind` belongs to a different step.
    fn submit(
        &mut self,
        player: PlayerId,
        code: &RoomCode,
        kind: StepKind,
        content: String,
    ) -> Outbound {
        let now = self.clock.now();
        let (Some(room), Some(round)) =
            (self.registry.get_room_mut(code), self.rounds.get_mut(code))
        else {
            debug!(room = %code, player_id = %player, "submission for a room with no game");
            return Vec::new();
        };
        if room.state != RoomState::Playing || round.phase != Phase::Collecting {
            debug!(room = %code, player_id = %player, "submission between steps ignored");
            return Vec::new();
        }
        let Some(seat) = round.seat_of(player).filter(|_| room.has_player(player)) else {
            debug!(room = %code, player_id = %player, "submission from unseated player");
            return Vec::new();
        };
        if round.has_submitted(seat) {
            debug!(room = %code, player_id = %player, step = round.step, "duplicate submission");
            return Vec::new();
        }
        if round.task_kind().step_kind() != kind {
            debug!(room = %code, player_id = %player, ?kind, "submission for another step");
            return Vec::new();
        }

        let chain_index = round.chain_for(seat);
        let author = &round.seats[seat];
        let Some(chain) = room.chains.get_mut(chain_index) else {
            warn!(room = %code, chain_index, "chain missing");
            return Vec::new();
        };
        chain.steps.push(Step {
            kind,
            content,
            author: author.name.clone(),
            author_avatar: author.avatar.clone(),
            timestamp: now,
            timed_out: false,
        });
        round.mark_submitted(seat);

        let (submitted, total) = round.progress(|id| room.has_player(id));
        let mut out = vec![(
            Recipient::Room(code.clone()),
            ServerEvent::SubmissionProgress { submitted, total },
        )];
        if submitted >= total {
            out.extend(self.fill_and_advance(code));
        }
        out
    }

    /// Fills every seat that has not submitted with a timed-out
    /// placeholder, then advances.
    ///
    /// Used when the countdown runs out and when everyone still present
    /// has submitted, so every chain grows by exactly one entry per step.
    fn fill_and_advance(&mut self, code: &RoomCode) -> Outbound {
        let now = self.clock.now();
        let (Some(room), Some(round)) =
            (self.registry.get_room_mut(code), self.rounds.get_mut(code))
        else {
            return Vec::new();
        };
        if round.phase != Phase::Collecting {
            return Vec::new();
        }

        let kind = round.task_kind().step_kind();
        let content = match kind {
            StepKind::Phrase => &self.config.timeout_phrase,
            StepKind::Drawing => &self.config.timeout_drawing,
        };
        let pending: Vec<usize> = round.pending_seats().collect();
        for &seat in &pending {
            let occupant = &round.seats[seat];
            if let Some(chain) = room.chains.get_mut(round.chain_for(seat)) {
                chain.steps.push(Step {
                    kind,
                    content: content.clone(),
                    author: occupant.name.clone(),
                    author_avatar: occupant.avatar.clone(),
                    timestamp: now,
                    timed_out: true,
                });
            }
            round.mark_submitted(seat);
        }
        if !pending.is_empty() {
            debug!(room = %code, step = round.step, filled = pending.len(), "placeholders added");
        }

        self.next_step(code)
    }

    /// Closes the current step. Ends the game after the last one,
    /// otherwise announces the transition and schedules the next step.
    pub fn next_step(&mut self, code: &RoomCode) -> Outbound {
        self.timers.cancel(code);
        let Some(round) = self.rounds.get_mut(code) else {
            return Vec::new();
        };
        if round.advance() {
            return self.end_game(code);
        }

        let next_step = round.step;
        let total_steps = round.total_steps;
        self.timers.schedule(code.clone(), self.config.reveal_pause);
        vec![(
            Recipient::Room(code.clone()),
            ServerEvent::StepTransition {
                next_step,
                total_steps,
            },
        )]
    }

    /// Scores the game, credits players, archives the chains, and moves
    /// the room to `revealing`.
    pub fn end_game(&mut self, code: &RoomCode) -> Outbound {
        self.timers.cancel(code);
        self.rounds.remove(code);
        let date = self.clock.now();
        let Some(room) = self.registry.get_room_mut(code) else {
            return Vec::new();
        };
        if !room.advance_to(RoomState::Revealing) {
            warn!(room = %code, state = %room.state, "end_game outside of play");
            return Vec::new();
        }

        let results = score_chains(&room.chains, &room.players);
        for (name, points) in &results.scores {
            if let Some(player) = room.player_by_name_mut(name) {
                player.score += points;
            }
        }
        for achievement in &results.achievements {
            if let Some(player) = room.player_by_name_mut(&achievement.player) {
                player.achievements.push(achievement.clone());
            }
        }
        room.gallery.extend(room.chains.iter().map(|chain| GalleryEntry {
            chain: chain.clone(),
            date,
            votes: 0,
        }));

        info!(
            room = %code,
            chains = room.chains.len(),
            achievements = results.achievements.len(),
            "game ended"
        );

        let achievements = results.achievements.clone();
        vec![(
            Recipient::Room(code.clone()),
            ServerEvent::GameEnded {
                chains: room.chains.clone(),
                results,
                achievements,
            },
        )]
    }

    /// Counts an emoji reaction on a chain entry.
    ///
    /// While the room is revealing, the last game's chains are also the
    /// tail of the gallery, and the archived copy is counted too.
    /// Returns `false` if the room or chain does not exist.
    pub fn add_reaction(
        &mut self,
        code: &RoomCode,
        chain_index: usize,
        step_index: usize,
        emoji: String,
    ) -> bool {
        let Some(room) = self.registry.get_room_mut(code) else {
            return false;
        };
        if chain_index >= room.chains.len() {
            return false;
        }
        let key = ReactionKey::new(chain_index, step_index);

        if room.state == RoomState::Revealing {
            let first = room.gallery.len().saturating_sub(room.chains.len());
            if let Some(entry) = room.gallery.get_mut(first + chain_index) {
                bump(&mut entry.chain.reactions, key, &emoji);
            }
        }
        bump(&mut room.chains[chain_index].reactions, key, &emoji);
        true
    }

    /// Removes a player from their room.
    ///
    /// Tells the rest of the room, or tears the game down if nobody is
    /// left. If everyone still seated has already submitted, the step
    /// completes right away.
    pub fn leave(&mut self, player: PlayerId) -> Outbound {
        let Some(code) = self.registry.remove_player(player) else {
            return Vec::new();
        };
        let Some(room) = self.registry.get_room(&code) else {
            self.rounds.remove(&code);
            self.timers.cancel(&code);
            debug!(room = %code, "game state dropped with room");
            return Vec::new();
        };

        let mut out = vec![(
            Recipient::Room(code.clone()),
            ServerEvent::PlayerLeft {
                players: room.players.clone(),
                left_player_id: player,
            },
        )];

        let progress = self
            .rounds
            .get(&code)
            .filter(|round| room.state == RoomState::Playing && round.is_collecting())
            .map(|round| round.progress(|id| room.has_player(id)));
        if let Some((submitted, total)) = progress {
            out.push((
                Recipient::Room(code.clone()),
                ServerEvent::SubmissionProgress { submitted, total },
            ));
            if submitted >= total {
                out.extend(self.fill_and_advance(&code));
            }
        }
        out
    }

    fn room(&self, code: &RoomCode) -> Result<&Room, GameError> {
        self.registry
            .get_room(code)
            .ok_or_else(|| scrawl_room::RoomError::NotFound(code.clone()).into())
    }

    fn room_mut(&mut self, code: &RoomCode) -> Result<&mut Room, GameError> {
        self.registry
            .get_room_mut(code)
            .ok_or_else(|| scrawl_room::RoomError::NotFound(code.clone()).into())
    }
}

fn bump(
    reactions: &mut BTreeMap<ReactionKey, BTreeMap<String, u32>>,
    key: ReactionKey,
    emoji: &str,
) {
    *reactions
        .entry(key)
        .or_default()
        .entry(emoji.to_owned())
        .or_insert(0) += 1;
}
