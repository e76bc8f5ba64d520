//! Room registry: creates, tracks, and routes players to rooms.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use scrawl_protocol::{Player, PlayerId, RoomCode, SettingsRequest};

use crate::{Room, RoomError, generate_code, normalize_settings, random_avatar};

/// Every live room, plus which room each player sits in.
///
/// A player is in at most one room. A room exists only while it has
/// players: removing the last one deletes it.
#[derive(Debug)]
pub struct RoomRegistry {
    /// Active rooms, keyed by code.
    rooms: HashMap<RoomCode, Room>,

    /// Maps each player to the room they're currently in.
    player_rooms: HashMap<PlayerId, RoomCode>,

    rng: StdRng,
}

impl RoomRegistry {
    /// Creates an empty registry seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates an empty registry with a fixed seed, for reproducible codes
    /// and avatars.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            rng,
        }
    }

    /// Opens a new room in the lobby with `host_id` as host and only
    /// player.
    ///
    /// The caller must make sure the host is not seated elsewhere; see
    /// [`room_by_player`](Self::room_by_player).
    pub fn create_room(
        &mut self,
        host_id: PlayerId,
        host_name: impl Into<String>,
        settings: SettingsRequest,
    ) -> &Room {
        let rooms = &self.rooms;
        let code = generate_code(&mut self.rng, |code| rooms.contains_key(code));
        let host = Player::new(host_id, host_name, random_avatar(&mut self.rng));
        let room = Room::new(code.clone(), host, normalize_settings(settings));

        tracing::info!(
            room = %code,
            host = %host_id,
            draw_time = room.settings.draw_time,
            guess_time = room.settings.guess_time,
            modifiers = room.settings.modifiers,
            "room created"
        );

        self.player_rooms.insert(host_id, code.clone());
        self.rooms.entry(code).or_insert(room)
    }

    /// Seats a player in an existing lobby.
    ///
    /// Checks run in this order and a failure changes nothing: the room
    /// exists, it is still in the lobby, it has a free seat, and nobody
    /// there uses `name`. A player already seated anywhere is refused.
    pub fn join_room(
        &mut self,
        code: &RoomCode,
        player_id: PlayerId,
        name: impl Into<String>,
    ) -> Result<&Room, RoomError> {
        let name = name.into();
        if let Some(current) = self.player_rooms.get(&player_id) {
            return Err(RoomError::AlreadyInRoom(current.clone()));
        }

        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        if !room.state.is_joinable() {
            return Err(RoomError::AlreadyStarted(code.clone()));
        }
        if room.is_full() {
            return Err(RoomError::RoomFull(code.clone()));
        }
        if room.players.iter().any(|p| p.name == name) {
            return Err(RoomError::NameTaken(name));
        }

        let avatar = random_avatar(&mut self.rng);
        room.players.push(Player::new(player_id, name, avatar));
        self.player_rooms.insert(player_id, code.clone());

        tracing::info!(
            room = %code,
            player_id = %player_id,
            players = room.players.len(),
            "player joined"
        );
        Ok(room)
    }

    /// Removes a player from whatever room they are in.
    ///
    /// Returns the room's code, or `None` if the player was not seated.
    /// When the room is left empty it is deleted, which callers detect
    /// with [`get_room`](Self::get_room). Otherwise, if the host left, the
    /// first remaining player becomes host.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<RoomCode> {
        let code = self.player_rooms.remove(&player_id)?;
        let room = self.rooms.get_mut(&code)?;
        room.players.retain(|p| p.id != player_id);

        tracing::info!(room = %code, player_id = %player_id, "player left");

        if room.players.is_empty() {
            self.rooms.remove(&code);
            tracing::info!(room = %code, "room deleted");
        } else if room.host_id == player_id {
            room.host_id = room.players[0].id;
            tracing::info!(room = %code, host = %room.host_id, "host reassigned");
        }
        Some(code)
    }

    pub fn get_room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_room_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Returns the code of the room a player is in, if any.
    pub fn room_by_player(&self, player_id: PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(&player_id)
    }

    /// Ids of everyone in the room, in seat order. Empty if the room is
    /// gone.
    pub fn members(&self, code: &RoomCode) -> Vec<PlayerId> {
        self.rooms
            .get(code)
            .map(Room::player_ids)
            .unwrap_or_default()
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
