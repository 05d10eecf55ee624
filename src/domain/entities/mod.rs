//! Domain entities - Core business objects with identity

mod personality;
mod story_turn;

pub use personality::{Personality, PersonalityType};
pub use story_turn::{StoryTurn, TurnType};
