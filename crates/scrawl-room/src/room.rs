//! A single room.

use scrawl_protocol::{
    Chain, GalleryEntry, Player, PlayerId, RoomCode, RoomSettings, RoomState,
    RoomView,
};

/// One room: who is in it, how it is configured, and what has been drawn.
///
/// Player order is join order. It is also the rotation order when a game
/// starts, and the first player is the one promoted if the host leaves.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub host_id: PlayerId,
    pub players: Vec<Player>,
    pub settings: RoomSettings,
    pub state: RoomState,
    /// Chains of the current (or last) game.
    pub chains: Vec<Chain>,
    /// Every chain from every finished game, oldest first.
    pub gallery: Vec<GalleryEntry>,
}

impl Room {
    /// Creates a lobby with `host` as its only player.
    pub fn new(code: RoomCode, host: Player, settings: RoomSettings) -> Self {
        Self {
            code,
            host_id: host.id,
            players: vec![host],
            settings,
            state: RoomState::Lobby,
            chains: Vec::new(),
            gallery: Vec::new(),
        }
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Finds a player by display name (case-sensitive).
    pub fn player_by_name_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn is_host(&self, player_id: PlayerId) -> bool {
        self.host_id == player_id
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.settings.max_players
    }

    /// Moves to `target` if it is the next lifecycle state.
    ///
    /// Returns `false` and leaves the state alone otherwise.
    pub fn advance_to(&mut self, target: RoomState) -> bool {
        if self.state.can_transition_to(target) {
            self.state = target;
            true
        } else {
            false
        }
    }

    /// Snapshot sent to clients on create and join.
    pub fn view(&self) -> RoomView {
        RoomView {
            id: self.code.clone(),
            host_id: self.host_id,
            players: self.players.clone(),
            settings: self.settings.clone(),
            state: self.state,
            gallery: self.gallery.clone(),
        }
    }
}
