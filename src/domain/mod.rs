//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Catalog: built-in personality presets, avatars, and special personalities
//! - Entities: Personality, StoryTurn
//! - Value Objects: GameStatus, identifiers, LLM settings
//! - Aggregates: GameSession aggregate root
//! - Errors: Domain rule violations

pub mod aggregates;
pub mod catalog;
pub mod entities;
pub mod errors;
pub mod value_objects;
