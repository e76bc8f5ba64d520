//! Room codes and avatars.

use rand::Rng;
use rand::seq::IndexedRandom;

use scrawl_protocol::RoomCode;

/// Characters used in room codes. `I`, `O`, `0` and `1` are left out so
/// codes read unambiguously aloud and on small screens.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const CODE_LEN: usize = 5;

pub const AVATARS: [&str; 20] = [
    "🐱", "🐶", "🦊", "🐸", "🐧", "🦄", "🐼", "🐨", "🦁", "🐮", "🐷", "🐵",
    "🐔", "🦋", "🐙", "👽", "🤖", "👻", "🎃", "🦖",
];

/// Draws random codes until `is_taken` rejects none.
pub fn generate_code<R: Rng + ?Sized>(
    rng: &mut R,
    mut is_taken: impl FnMut(&RoomCode) -> bool,
) -> RoomCode {
    loop {
        let code: String = (0..CODE_LEN)
            .map(|_| {
                CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char
            })
            .collect();
        let code = RoomCode::new(code);
        if !is_taken(&code) {
            return code;
        }
    }
}

/// Picks an avatar. Two players in a room may get the same one.
pub fn random_avatar<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AVATARS.choose(rng).copied().unwrap_or("🐱")
}
