//! Drawing modifiers and per-game modifier plans.
//!
//! Modifiers are enforced by the client's canvas. The server only picks
//! them; step timers always follow the room settings.

use rand::Rng;
use rand::seq::IndexedRandom;

use scrawl_protocol::Modifier;

/// Colours `one-color` can pick from.
pub const PALETTE: [&str; 6] =
    ["#FF0000", "#00FF00", "#0000FF", "#FF00FF", "#FFAA00", "#00FFFF"];

/// Catalog ids, in catalog order. `none` is a real entry: drawing it
/// means the player got lucky.
pub const MODIFIER_IDS: [&str; 9] = [
    "no-lift",
    "one-color",
    "pixel",
    "mirror",
    "upside-down",
    "speed",
    "fog",
    "thick",
    "none",
];

fn modifier(id: &str, name: &str, icon: &str, description: &str) -> Modifier {
    Modifier {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        color: None,
    }
}

/// The full catalog, with `one-color` fixed to `color`.
pub fn catalog(color: &str) -> Vec<Modifier> {
    vec![
        modifier("no-lift", "No Lift", "🖌", "Draw it in one stroke!"),
        Modifier {
            color: Some(color.to_string()),
            ..modifier("one-color", "One Color", "🎨", "Only one random colour")
        },
        modifier("pixel", "Pixel Art", "⬛", "16x16 grid"),
        modifier("mirror", "Mirror", "🪞", "The canvas is mirrored!"),
        modifier("upside-down", "Upside Down", "🔄", "The canvas is flipped!"),
        modifier("speed", "Bomb", "💣", "Only 15 seconds!"),
        modifier("fog", "Fog of War", "👀", "You only see part of the canvas"),
        modifier("thick", "Thick Brush", "🖊", "Brush is at least 20px"),
        modifier("none", "No Modifier", "✨", "Lucky you!"),
    ]
}

/// Picks a modifier for every step of a game.
///
/// Step 0 and every other even step are phrase steps and get `None`.
/// Each odd (drawing) step gets a uniform pick from the catalog, `none`
/// included. The `one-color` colour is drawn once per plan.
pub fn plan_modifiers<R: Rng + ?Sized>(
    total_steps: usize,
    rng: &mut R,
) -> Vec<Option<Modifier>> {
    let color = PALETTE.choose(rng).copied().unwrap_or(PALETTE[0]);
    let catalog = catalog(color);
    (0..total_steps)
        .map(|step| {
            if step % 2 == 1 {
                catalog.choose(rng).cloned()
            } else {
                None
            }
        })
        .collect()
}
