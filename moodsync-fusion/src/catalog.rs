// Mood Catalog and Normalizer
//
// Fixed table of canonical moods placed on the valence/arousal circumplex,
// plus synonyms and emoji mapping onto canonical keys.
// Built once on first use, read-only afterwards.

use crate::types::AffectivePoint;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Canonical key every unknown token resolves to
pub const NEUTRAL_KEY: &str = "neutral";

/// Position of `neutral` in the declaration order
const NEUTRAL_INDEX: usize = 9;

/// One canonical mood
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Canonical key (lowercase)
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    pub point: AffectivePoint,
}

const fn entry(key: &'static str, label: &'static str, valence: f64, arousal: f64) -> CatalogEntry {
    CatalogEntry {
        key,
        label,
        point: AffectivePoint::new(valence, arousal),
    }
}

/// Canonical moods in declaration order
///
/// Order matters: classification ties go to the earlier entry.
/// `neutral` is the only entry at the origin.
static ENTRIES: [CatalogEntry; 16] = [
    entry("happy", "Happy", 0.8, 0.5),
    entry("excited", "Excited", 0.8, 0.9),
    entry("energetic", "Energetic", 0.5, 0.8),
    entry("romantic", "Romantic", 0.7, 0.2),
    entry("content", "Content", 0.6, 0.0),
    entry("calm", "Calm", 0.6, -0.4),
    entry("relaxed", "Relaxed", 0.4, -0.7),
    entry("focused", "Focused", 0.2, 0.3),
    entry("nostalgic", "Nostalgic", 0.1, -0.3),
    entry("neutral", "Neutral", 0.0, 0.0),
    entry("tired", "Tired", -0.2, -0.8),
    entry("bored", "Bored", -0.4, -0.5),
    entry("sad", "Sad", -0.7, -0.4),
    entry("frustrated", "Frustrated", -0.5, 0.4),
    entry("anxious", "Anxious", -0.4, 0.7),
    entry("angry", "Angry", -0.7, 0.8),
];

static KEY_INDEX: Lazy<HashMap<&'static str, &'static CatalogEntry>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.key, e)).collect());

/// Helper macro for building the alias table
macro_rules! aliases {
    ($($canonical:expr => [$($alias:expr),* $(,)?]),* $(,)?) => {{
        let mut map: HashMap<&'static str, &'static str> = HashMap::new();
        $($(map.insert($alias, $canonical);)*)*
        map
    }};
}

/// Synonyms and emoji → canonical key (lowercase)
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    aliases! {
        "happy" => ["joyful", "joy", "cheerful", "glad", "delighted", "upbeat", "😊", "😀", "😄", "😁", "🙂"],
        "excited" => ["thrilled", "ecstatic", "elated", "hyped", "🤩", "🥳"],
        "energetic" => ["pumped", "lively", "active", "⚡", "💪"],
        "romantic" => ["love", "loving", "in love", "😍", "🥰", "❤️", "❤"],
        "content" => ["satisfied", "fine", "good", "ok", "okay", "😌"],
        "calm" => ["peaceful", "serene", "tranquil", "🧘", "🌿"],
        "relaxed" => ["chill", "chilled", "mellow", "laid back", "😎"],
        "focused" => ["concentrated", "determined", "productive", "🤔", "🎯"],
        "nostalgic" => ["wistful", "reminiscent", "sentimental", "🥹"],
        "neutral" => ["meh", "indifferent", "blank", "😐", "😶"],
        "tired" => ["sleepy", "exhausted", "drained", "fatigued", "😴", "🥱"],
        "bored" => ["uninterested", "restless", "😒", "🙄"],
        "sad" => ["unhappy", "down", "depressed", "blue", "melancholy", "melancholic", "gloomy", "😢", "😭", "☹️", "🙁", "😞"],
        "frustrated" => ["annoyed", "irritated", "fed up", "😤", "😩"],
        "anxious" => ["nervous", "worried", "stressed", "tense", "scared", "afraid", "😰", "😨", "😟"],
        "angry" => ["mad", "furious", "enraged", "rage", "😠", "😡", "🤬"],
    }
});

/// All canonical entries in declaration order
pub fn entries() -> &'static [CatalogEntry] {
    &ENTRIES
}

/// Map any token to a canonical key
///
/// Lookup order: canonical key, then alias/emoji, then `neutral`.
/// Surrounding whitespace and case are ignored. Never fails.
pub fn normalize(token: &str) -> &'static str {
    resolve(token).unwrap_or_else(|| {
        tracing::debug!("Unknown mood token {:?}, falling back to {}", token, NEUTRAL_KEY);
        NEUTRAL_KEY
    })
}

/// True if the token names a canonical mood or a known alias/emoji
///
/// `neutral` itself is valid; tokens that would only reach neutral through
/// the fallback are not.
pub fn is_valid_mood(token: &str) -> bool {
    resolve(token).is_some()
}

/// Catalog entry for a canonical key
///
/// Keys produced by [`normalize`] always resolve. Anything else yields the
/// neutral entry rather than failing.
pub fn vector_of(canonical_key: &str) -> &'static CatalogEntry {
    KEY_INDEX
        .get(canonical_key)
        .copied()
        .unwrap_or(&ENTRIES[NEUTRAL_INDEX])
}

/// Normalize a token and return its catalog entry
pub fn lookup(token: &str) -> &'static CatalogEntry {
    vector_of(normalize(token))
}

fn resolve(token: &str) -> Option<&'static str> {
    let cleaned = token.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(entry) = KEY_INDEX.get(cleaned.as_str()) {
        return Some(entry.key);
    }

    ALIASES.get(cleaned.as_str()).copied()
}
