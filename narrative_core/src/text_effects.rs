//! Text transforms applied to narration: archetype flavour and sanity-driven
//! corruption.

use story_rules::Archetype;

use crate::config::EngineConfig;
use crate::random::RandomSource;

/// Prefix for scrambled narration.
pub const DISORIENTATION_MARKER: &str = "[Your thoughts scatter] ";

/// Phrases appended to narration when sanity is low.
pub const UNSETTLING_PHRASES: [&str; 4] = [
    " Something behind you is breathing in time with you.",
    " The walls lean closer when you are not looking.",
    " You are almost sure you have done this before.",
    " Somewhere, a voice repeats your last thought back to you.",
];

/// Append the archetype's flavour line. Undefined passes through unchanged.
pub fn archetype_flavor(text: &str, archetype: Archetype) -> String {
    let suffix = match archetype {
        Archetype::SilentObserver => " You take it in quietly, missing nothing.",
        Archetype::AgentOfChaos => " Part of you wonders what would happen if it broke.",
        Archetype::EmotionEngine => " You feel it before you understand it.",
        Archetype::GoldenMaskedOracle => " Behind the mask, you sense what comes next.",
        Archetype::Undefined => return text.to_string(),
    };
    format!("{}{}", text, suffix)
}

/// Which corruption, if any, was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    Scrambled,
    PhraseAppended,
    Untouched,
}

/// Degrade narration when sanity is below the configured threshold.
///
/// One draw decides the band: `[0, scramble)` scrambles words,
/// `[scramble, scramble + phrase)` appends an unsettling phrase, anything
/// else leaves the text alone. Sanity at or above the threshold draws nothing.
pub fn corrupt(
    text: &str,
    sanity: i32,
    config: &EngineConfig,
    rng: &mut dyn RandomSource,
) -> (String, Corruption) {
    if sanity >= config.corruption_sanity_threshold {
        return (text.to_string(), Corruption::Untouched);
    }

    let roll = rng.next_f64();
    if roll < config.scramble_chance {
        let scrambled = scramble_words(text, config.word_scramble_chance, rng);
        (
            format!("{}{}", DISORIENTATION_MARKER, scrambled),
            Corruption::Scrambled,
        )
    } else if roll < config.scramble_chance + config.phrase_chance {
        let phrase = UNSETTLING_PHRASES[rng.next_index(UNSETTLING_PHRASES.len())];
        (format!("{}{}", text, phrase), Corruption::PhraseAppended)
    } else {
        (text.to_string(), Corruption::Untouched)
    }
}

/// Shuffle the interior characters of some words longer than three
/// characters. First and last characters stay in place.
pub fn scramble_words(text: &str, word_chance: f64, rng: &mut dyn RandomSource) -> String {
    text.split(' ')
        .map(|word| {
            let chars: Vec<char> = word.chars().collect();
            if chars.len() > 3 && rng.chance(word_chance) {
                scramble_interior(chars, rng)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn scramble_interior(mut chars: Vec<char>, rng: &mut dyn RandomSource) -> String {
    let last = chars.len() - 1;
    let interior = &mut chars[1..last];
    for i in (1..interior.len()).rev() {
        let j = rng.next_index(i + 1);
        interior.swap(i, j);
    }
    chars.into_iter().collect()
}
