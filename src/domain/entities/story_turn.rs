//! StoryTurn entity - one utterance in the story

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Personality;
use crate::domain::value_objects::TurnId;

/// Kind of story turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnType {
    /// Ordinary dialogue from an AI or the human player
    Bot,
    /// Editorial recap of the story so far
    Summary,
}

/// One recorded utterance attributed to a personality.
///
/// The personality is shared with the session's cast; many turns point at the
/// same `Arc`. On the wire the personality record is embedded in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryTurn {
    id: TurnId,
    personality: Arc<Personality>,
    text: String,
    #[serde(rename = "type")]
    turn_type: TurnType,
}

impl StoryTurn {
    pub fn new(personality: Arc<Personality>, text: impl Into<String>, turn_type: TurnType) -> Self {
        Self {
            id: TurnId::new(),
            personality,
            text: text.into(),
            turn_type,
        }
    }

    pub fn bot(personality: Arc<Personality>, text: impl Into<String>) -> Self {
        Self::new(personality, text, TurnType::Bot)
    }

    pub fn summary(personality: Arc<Personality>, text: impl Into<String>) -> Self {
        Self::new(personality, text, TurnType::Summary)
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn personality(&self) -> &Arc<Personality> {
        &self.personality
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn turn_type(&self) -> TurnType {
        self.turn_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{EDITOR_PERSONALITY, USER_PERSONALITY};

    #[test]
    fn test_turns_share_personality_handle() {
        let user = Arc::clone(&USER_PERSONALITY);
        let first = StoryTurn::bot(Arc::clone(&user), "Once upon a time");
        let second = StoryTurn::bot(Arc::clone(&user), "there was a dog.");

        assert!(Arc::ptr_eq(first.personality(), second.personality()));
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_json_round_trip() {
        let turn = StoryTurn::summary(Arc::clone(&EDITOR_PERSONALITY), "It was a dark night.");

        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["type"], "summary");
        assert_eq!(json["personality"]["id"], "editor");
        assert_eq!(json["text"], "It was a dark night.");

        let back: StoryTurn = serde_json::from_value(json).unwrap();
        assert_eq!(back, turn);
    }

    #[test]
    fn test_rejects_unknown_turn_type() {
        let json = serde_json::json!({
            "id": TurnId::new(),
            "personality": {
                "id": "narrator",
                "name": "Narrator",
                "prompt": "",
                "avatar": "📖",
                "type": "ai"
            },
            "text": "Hello",
            "type": "aside"
        });
        assert!(serde_json::from_value::<StoryTurn>(json).is_err());
    }
}
