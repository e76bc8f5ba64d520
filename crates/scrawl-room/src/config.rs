//! Room settings defaults and normalization.

use scrawl_protocol::{RoomSettings, SettingsRequest};

/// Seconds for a drawing step.
pub const DEFAULT_DRAW_TIME: u32 = 60;
/// Seconds for writing or guessing a phrase.
pub const DEFAULT_GUESS_TIME: u32 = 45;
pub const DEFAULT_MODE: &str = "classic";
pub const DEFAULT_MAX_PLAYERS: usize = 10;
pub const DEFAULT_ROUNDS: u32 = 1;

/// The settings a room gets when the client sends none.
pub fn default_settings() -> RoomSettings {
    RoomSettings {
        draw_time: DEFAULT_DRAW_TIME,
        guess_time: DEFAULT_GUESS_TIME,
        mode: DEFAULT_MODE.to_string(),
        modifiers: false,
        max_players: DEFAULT_MAX_PLAYERS,
        rounds: DEFAULT_ROUNDS,
    }
}

/// Turns client-supplied settings into room settings.
///
/// Missing values take the default. So do zero numbers and an empty mode
/// name: a zero-second step or a zero-player room is never what the
/// client meant.
pub fn normalize_settings(request: SettingsRequest) -> RoomSettings {
    let defaults = default_settings();
    RoomSettings {
        draw_time: nonzero(request.draw_time).unwrap_or(defaults.draw_time),
        guess_time: nonzero(request.guess_time).unwrap_or(defaults.guess_time),
        mode: request
            .mode
            .filter(|mode| !mode.is_empty())
            .unwrap_or(defaults.mode),
        modifiers: request.modifiers.unwrap_or(defaults.modifiers),
        max_players: request
            .max_players
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_players),
        rounds: nonzero(request.rounds).unwrap_or(defaults.rounds),
    }
}

fn nonzero(value: Option<u32>) -> Option<u32> {
    value.filter(|&v| v > 0)
}
