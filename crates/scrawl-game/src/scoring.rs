//! End-of-game scoring and achievements.

use std::collections::BTreeMap;

use scrawl_protocol::{
    Achievement, AchievementKind, Chain, GameResults, Player, StepKind,
};

/// Points for guessing the opening phrase word for word.
pub const TELEPATH_BONUS: i64 = 50;

/// Similarity below this earns the `destroyer` achievement.
pub const DESTROYER_THRESHOLD: f64 = 0.1;

/// Lower-cases and trims a phrase for comparison.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

/// Word-overlap similarity between two phrases, in `0.0..=1.0`.
///
/// Identical strings score 1, as does a pair whose longer string is
/// empty. Otherwise the words of the shorter string (split on single
/// spaces) that also appear among the longer string's words are counted
/// and divided by the larger word count. Length is measured in UTF-16
/// code units, which is what the browser client measures.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (longer, shorter) = if utf16_len(a) > utf16_len(b) {
        (a, b)
    } else {
        (b, a)
    };
    if longer.is_empty() {
        return 1.0;
    }

    let longer_words: Vec<&str> = longer.split(' ').collect();
    let shorter_words: Vec<&str> = shorter.split(' ').collect();
    let matches = shorter_words
        .iter()
        .filter(|word| longer_words.contains(word))
        .count();

    matches as f64 / longer_words.len().max(shorter_words.len()) as f64
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Scores a finished game.
///
/// Every player in `players` starts at 0. For each chain with at least two
/// steps that ends on a phrase, the first and last phrases are normalized
/// and, when both are non-empty, compared:
///
/// - an exact match gives the last author [`TELEPATH_BONUS`] points and a
///   `telepath` achievement;
/// - independently, a similarity below [`DESTROYER_THRESHOLD`] gives the
///   author of the second step a `destroyer` achievement.
///
/// Authors are credited by name, so a player who left mid-game can still
/// appear in the results.
pub fn score_chains(chains: &[Chain], players: &[Player]) -> GameResults {
    let mut scores: BTreeMap<String, i64> =
        players.iter().map(|p| (p.name.clone(), 0)).collect();
    let mut achievements = Vec::new();

    for chain in chains {
        let [first, .., last] = chain.steps.as_slice() else {
            continue;
        };
        if last.kind != StepKind::Phrase {
            continue;
        }
        let first_phrase = normalize_phrase(&first.content);
        let last_phrase = normalize_phrase(&last.content);
        if first_phrase.is_empty() || last_phrase.is_empty() {
            continue;
        }

        if first_phrase == last_phrase {
            *scores.entry(last.author.clone()).or_insert(0) += TELEPATH_BONUS;
            achievements.push(Achievement {
                player: last.author.clone(),
                kind: AchievementKind::Telepath,
                icon: "🎯".to_string(),
                text: "Telepath! Guessed it word for word!".to_string(),
            });
        }

        if similarity(&first_phrase, &last_phrase) < DESTROYER_THRESHOLD {
            achievements.push(Achievement {
                player: chain.steps[1].author.clone(),
                kind: AchievementKind::Destroyer,
                icon: "💀".to_string(),
                text: format!(
                    "Destroyer! \"{}\" → \"{}\"",
                    first.content, last.content
                ),
            });
        }
    }

    GameResults {
        scores,
        achievements,
    }
}
