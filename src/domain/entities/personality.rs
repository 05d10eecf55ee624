//! Personality entity - a speaking identity in the story

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::PersonalityId;

/// Whether a personality's lines are generated or typed by a human
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityType {
    Ai,
    User,
}

/// A named speaking identity with a behavioral prompt and an emoji avatar.
///
/// Fields are private so that a `User` personality can never carry a prompt.
/// Deserialization goes through the same check as [`Personality::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersonalityRecord", into = "PersonalityRecord")]
pub struct Personality {
    id: PersonalityId,
    name: String,
    prompt: String,
    avatar: String,
    personality_type: PersonalityType,
}

impl Personality {
    pub fn new(
        id: PersonalityId,
        name: impl Into<String>,
        prompt: impl Into<String>,
        avatar: impl Into<String>,
        personality_type: PersonalityType,
    ) -> Result<Self, DomainError> {
        let personality = Self {
            id,
            name: name.into(),
            prompt: prompt.into(),
            avatar: avatar.into(),
            personality_type,
        };
        personality.validate()?;
        Ok(personality)
    }

    /// Create an AI personality with a freshly generated id
    pub fn ai(
        name: impl Into<String>,
        prompt: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(PersonalityId::generate(), name, prompt, avatar, PersonalityType::Ai)
    }

    /// Build one of the built-in personalities whose literals are known to be valid
    pub(crate) fn builtin(
        id: &str,
        name: &str,
        prompt: &str,
        avatar: &str,
        personality_type: PersonalityType,
    ) -> Self {
        Self {
            id: PersonalityId::new(id),
            name: name.to_string(),
            prompt: prompt.to_string(),
            avatar: avatar.to_string(),
            personality_type,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::validation("Personality id must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Personality name must not be empty"));
        }
        // One user-perceived character; ZWJ emoji span several chars
        if self.avatar.graphemes(true).count() != 1 {
            return Err(DomainError::validation(format!(
                "Personality avatar must be a single glyph, got '{}'",
                self.avatar
            )));
        }
        if self.personality_type == PersonalityType::User && !self.prompt.is_empty() {
            return Err(DomainError::validation(format!(
                "User personality '{}' must have an empty prompt",
                self.id
            )));
        }
        Ok(())
    }

    pub fn id(&self) -> &PersonalityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn personality_type(&self) -> PersonalityType {
        self.personality_type
    }

    pub fn is_ai(&self) -> bool {
        self.personality_type == PersonalityType::Ai
    }
}

/// Wire shape of a personality
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersonalityRecord {
    id: PersonalityId,
    name: String,
    prompt: String,
    avatar: String,
    #[serde(rename = "type")]
    personality_type: PersonalityType,
}

impl TryFrom<PersonalityRecord> for Personality {
    type Error = DomainError;

    fn try_from(record: PersonalityRecord) -> Result<Self, Self::Error> {
        Personality::new(
            record.id,
            record.name,
            record.prompt,
            record.avatar,
            record.personality_type,
        )
    }
}

impl From<Personality> for PersonalityRecord {
    fn from(personality: Personality) -> Self {
        Self {
            id: personality.id,
            name: personality.name,
            prompt: personality.prompt,
            avatar: personality.avatar,
            personality_type: personality.personality_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_prompt_is_rejected() {
        let result = Personality::new(
            PersonalityId::from("someone"),
            "Someone",
            "talks a lot",
            "🧑‍💻",
            PersonalityType::User,
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_ai_with_empty_prompt_is_allowed() {
        let personality = Personality::new(
            PersonalityId::from("quiet"),
            "Quiet One",
            "",
            "🤖",
            PersonalityType::Ai,
        )
        .unwrap();
        assert!(personality.is_ai());
        assert_eq!(personality.prompt(), "");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        assert!(Personality::ai("  ", "a pirate", "🤖").is_err());
    }

    #[test]
    fn test_every_catalog_avatar_is_accepted() {
        for avatar in crate::domain::catalog::AVATARS {
            assert!(
                Personality::ai("Robot", "beeps", avatar).is_ok(),
                "avatar {avatar} was rejected"
            );
        }
    }

    #[test]
    fn test_avatar_must_be_one_glyph() {
        for avatar in ["", "definitely not one glyph", "🤖🤖", "ab", "🧙 "] {
            assert!(
                matches!(
                    Personality::ai("Robot", "beeps", avatar),
                    Err(DomainError::Validation(_))
                ),
                "avatar {avatar:?} was accepted"
            );
        }

        let json = r#"{"id":"x","name":"X","prompt":"","avatar":"not an emoji","type":"ai"}"#;
        assert!(serde_json::from_str::<Personality>(json).is_err());
    }

    #[test]
    fn test_json_shape_uses_type_tag() {
        let personality = Personality::new(
            PersonalityId::from("pirate"),
            "A Pirate Captain",
            "obsessed with treasure",
            "🧙",
            PersonalityType::Ai,
        )
        .unwrap();

        let value = serde_json::to_value(&personality).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "pirate",
                "name": "A Pirate Captain",
                "prompt": "obsessed with treasure",
                "avatar": "🧙",
                "type": "ai"
            })
        );

        let back: Personality = serde_json::from_value(value).unwrap();
        assert_eq!(back, personality);
    }

    #[test]
    fn test_deserialize_rejects_user_with_prompt() {
        let json = r#"{"id":"u","name":"You","prompt":"secret","avatar":"🧑‍💻","type":"user"}"#;
        let err = serde_json::from_str::<Personality>(json).unwrap_err();
        assert!(err.to_string().contains("must have an empty prompt"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_type_and_missing_fields() {
        let bad_type = r#"{"id":"x","name":"X","prompt":"","avatar":"🤖","type":"robot"}"#;
        assert!(serde_json::from_str::<Personality>(bad_type).is_err());

        let missing_avatar = r#"{"id":"x","name":"X","prompt":"","type":"ai"}"#;
        assert!(serde_json::from_str::<Personality>(missing_avatar).is_err());
    }
}
