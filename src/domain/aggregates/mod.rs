//! Aggregates - Consistency boundaries for domain entities

mod game_session;

pub use game_session::GameSession;
