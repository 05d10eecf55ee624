//! Lifecycle phase of a game session

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a game session.
///
/// Serialized as the exact upper-case tags; anything else fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Configuring participants before the story begins
    Setup,
    /// Turns are being exchanged
    Playing,
    /// Terminal
    Finished,
    /// Cast is being modified; returns to the phase it was entered from
    EditingCast,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Setup => "SETUP",
            GameStatus::Playing => "PLAYING",
            GameStatus::Finished => "FINISHED",
            GameStatus::EditingCast => "EDITING_CAST",
        }
    }

    /// Whether cast members may be added or removed in this phase
    pub fn allows_cast_changes(&self) -> bool {
        matches!(self, GameStatus::Setup | GameStatus::EditingCast)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SETUP" => Ok(GameStatus::Setup),
            "PLAYING" => Ok(GameStatus::Playing),
            "FINISHED" => Ok(GameStatus::Finished),
            "EDITING_CAST" => Ok(GameStatus::EditingCast),
            other => Err(format!("Unknown game status: {}", other)),
        }
    }
}
