//! Domain errors

use crate::domain::value_objects::{GameStatus, PersonalityId};

/// Errors raised when a domain rule is violated
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A record failed a structural or field rule
    #[error("Validation error: {0}")]
    Validation(String),
    /// The requested status change is not allowed from the current status
    #[error("Cannot {action} while the game is {status}")]
    InvalidTransition {
        action: &'static str,
        status: GameStatus,
    },
    #[error("Personality '{0}' is already in the cast")]
    DuplicatePersonality(PersonalityId),
    #[error("Personality '{0}' is reserved and cannot join the cast")]
    ReservedPersonality(PersonalityId),
    #[error("Personality '{0}' is not in the cast")]
    UnknownPersonality(PersonalityId),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}
