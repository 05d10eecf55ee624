//! Personality catalog - built-in presets, avatars, and special personalities
//!
//! Everything here is read-only and lives for the whole process.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entities::{Personality, PersonalityType};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::PersonalityId;

/// A built-in personality template offered as a starting choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalityPreset {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const FAMOUS_PERSONALITIES: [PersonalityPreset; 6] = [
    PersonalityPreset {
        name: "Jerry Seinfeld",
        prompt: "a neurotic comedian from New York who finds the absurd in everyday situations, often starting sentences with \"What's the deal with...\".",
    },
    PersonalityPreset {
        name: "Sherlock Holmes",
        prompt: "a brilliant, eccentric detective with extraordinary powers of observation and deduction, speaking with a cold, logical precision and occasional condescension.",
    },
    PersonalityPreset {
        name: "A Surfer Dude",
        prompt: "a laid-back, chill person who uses a lot of surf slang like \"gnarly\", \"radical\", \"bodacious\", and \"dude\", and sees everything in a positive, wave-riding light.",
    },
    PersonalityPreset {
        name: "A Film Noir Detective",
        prompt: "a world-weary, cynical private eye from the 1940s. It was a dark and stormy night... always. The dialogue is terse, full of shadows, suspicion, and dames.",
    },
    PersonalityPreset {
        name: "A Pirate Captain",
        prompt: "a swashbuckling pirate captain with a thick accent, obsessed with treasure, grog, and the sea. Often says \"Arrr!\" and refers to people as \"matey\" or \"landlubber\".",
    },
    PersonalityPreset {
        name: "A Valley Girl",
        prompt: "a bubbly but air-headed teenager from the 80s. Uses words like \"like\", \"totally\", \"for sure\", and \"gag me with a spoon\".",
    },
];

pub const AVATARS: [&str; 9] = [
    "🤖",
    "👽",
    "🧠",
    "🧙",
    "🕵️",
    "👨‍🎤",
    "👩‍🚀",
    "🧑‍🎨",
    "🧑‍💻",
];

/// Summarizes the story on request
pub static EDITOR_PERSONALITY: Lazy<Arc<Personality>> = Lazy::new(|| {
    Arc::new(Personality::builtin(
        "editor",
        "Story Editor",
        "A helpful AI assistant that summarizes stories.",
        "📝",
        PersonalityType::Ai,
    ))
});

/// The human player
pub static USER_PERSONALITY: Lazy<Arc<Personality>> = Lazy::new(|| {
    Arc::new(Personality::builtin(
        "user-player",
        "You",
        "",
        "🧑‍💻",
        PersonalityType::User,
    ))
});

pub static NARRATOR_PERSONALITY: Lazy<Arc<Personality>> = Lazy::new(|| {
    Arc::new(Personality::builtin(
        "narrator",
        "Narrator",
        "",
        "📖",
        PersonalityType::Ai,
    ))
});

/// Ids that belong to the special personalities and may not be reused by cast members
pub fn is_reserved_id(id: &PersonalityId) -> bool {
    id == EDITOR_PERSONALITY.id() || id == NARRATOR_PERSONALITY.id()
}

/// Look up a preset by its position in [`FAMOUS_PERSONALITIES`]
pub fn preset(index: usize) -> Option<&'static PersonalityPreset> {
    FAMOUS_PERSONALITIES.get(index)
}

/// Pick an avatar for a new personality
pub fn random_avatar<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AVATARS.choose(rng).copied().unwrap_or(AVATARS[0])
}

impl PersonalityPreset {
    /// Turn the preset into an AI personality with a fresh id and a random avatar
    pub fn instantiate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Personality, DomainError> {
        Personality::ai(self.name, self.prompt, random_avatar(rng))
    }
}
