//! Game Session Aggregate - cast, story turns, and lifecycle status
//!
//! All changes to a running game go through this aggregate so that the
//! status rules and cast rules hold together.
//!
//! Status transitions:
//! - `SETUP -> PLAYING` (start, needs at least one AI cast member)
//! - `SETUP | PLAYING -> EDITING_CAST`, and back to where it came from
//! - `PLAYING -> FINISHED` (terminal)

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::catalog::{self, EDITOR_PERSONALITY, NARRATOR_PERSONALITY, USER_PERSONALITY};
use crate::domain::entities::{Personality, PersonalityType, StoryTurn, TurnType};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{GameStatus, PersonalityId, SessionId};

/// The Game Session Aggregate Root
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    status: GameStatus,
    /// Status to return to when cast editing ends
    resume_status: Option<GameStatus>,
    cast: Vec<Arc<Personality>>,
    turns: Vec<StoryTurn>,
    /// Index into `cast` of the next speaker
    next_speaker: usize,
    created_at: DateTime<Utc>,
}

impl GameSession {
    /// New session in `SETUP` with the human player already in the cast
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            status: GameStatus::Setup,
            resume_status: None,
            cast: vec![Arc::clone(&USER_PERSONALITY)],
            turns: Vec::new(),
            next_speaker: 0,
            created_at: Utc::now(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn cast(&self) -> &[Arc<Personality>] {
        &self.cast
    }

    pub fn turns(&self) -> &[StoryTurn] {
        &self.turns
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn find_cast_member(&self, id: &PersonalityId) -> Option<&Arc<Personality>> {
        self.cast.iter().find(|p| p.id() == id)
    }

    /// Who speaks next, or `None` if the cast is empty
    pub fn next_speaker(&self) -> Option<&Arc<Personality>> {
        self.cast.get(self.next_speaker % self.cast.len().max(1))
    }

    /// Bot turns joined by newlines; summaries are left out
    pub fn story_so_far(&self) -> String {
        self.turns
            .iter()
            .filter(|turn| turn.turn_type() == TurnType::Bot)
            .map(|turn| turn.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prompts of every AI cast member that has one, in cast order
    pub fn personality_prompts(&self) -> Vec<String> {
        self.cast
            .iter()
            .filter(|p| p.is_ai() && !p.prompt().is_empty())
            .map(|p| p.prompt().to_string())
            .collect()
    }

    // ========================================================================
    // Cast management
    // ========================================================================

    pub fn add_cast_member(&mut self, personality: Personality) -> Result<Arc<Personality>, DomainError> {
        self.require_cast_changes("add a cast member")?;

        if catalog::is_reserved_id(personality.id()) {
            return Err(DomainError::ReservedPersonality(personality.id().clone()));
        }
        if self.find_cast_member(personality.id()).is_some() {
            return Err(DomainError::DuplicatePersonality(personality.id().clone()));
        }
        if personality.personality_type() == PersonalityType::User {
            return Err(DomainError::validation(
                "Only the built-in player personality may be a user",
            ));
        }

        let personality = Arc::new(personality);
        self.cast.push(Arc::clone(&personality));
        Ok(personality)
    }

    pub fn remove_cast_member(&mut self, id: &PersonalityId) -> Result<Arc<Personality>, DomainError> {
        self.require_cast_changes("remove a cast member")?;

        if id == USER_PERSONALITY.id() {
            return Err(DomainError::ReservedPersonality(id.clone()));
        }
        let index = self
            .cast
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| DomainError::UnknownPersonality(id.clone()))?;

        let removed = self.cast.remove(index);
        if index < self.next_speaker {
            self.next_speaker -= 1;
        }
        if self.next_speaker >= self.cast.len() {
            self.next_speaker = 0;
        }
        Ok(removed)
    }

    // ========================================================================
    // Status transitions
    // ========================================================================

    pub fn start(&mut self) -> Result<(), DomainError> {
        if self.status != GameStatus::Setup {
            return Err(self.invalid("start the game"));
        }
        if !self.cast.iter().any(|p| p.is_ai()) {
            return Err(DomainError::validation(
                "At least one AI personality is needed to start",
            ));
        }
        self.status = GameStatus::Playing;
        Ok(())
    }

    pub fn begin_editing_cast(&mut self) -> Result<(), DomainError> {
        match self.status {
            GameStatus::Setup | GameStatus::Playing => {
                self.resume_status = Some(self.status);
                self.status = GameStatus::EditingCast;
                Ok(())
            }
            _ => Err(self.invalid("edit the cast")),
        }
    }

    pub fn finish_editing_cast(&mut self) -> Result<(), DomainError> {
        if self.status != GameStatus::EditingCast {
            return Err(self.invalid("finish editing the cast"));
        }
        let resume = self.resume_status.take().unwrap_or(GameStatus::Setup);
        if resume == GameStatus::Playing && !self.cast.iter().any(|p| p.is_ai()) {
            self.resume_status = Some(resume);
            return Err(DomainError::validation(
                "At least one AI personality is needed to keep playing",
            ));
        }
        self.status = resume;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<(), DomainError> {
        if self.status != GameStatus::Playing {
            return Err(self.invalid("finish the game"));
        }
        self.status = GameStatus::Finished;
        Ok(())
    }

    // ========================================================================
    // Turns
    // ========================================================================

    /// Record a line from the cast member whose turn it is, then advance
    pub fn record_turn(
        &mut self,
        speaker: &PersonalityId,
        text: impl Into<String>,
    ) -> Result<&StoryTurn, DomainError> {
        if self.status != GameStatus::Playing {
            return Err(self.invalid("take a turn"));
        }
        let expected = self
            .next_speaker()
            .ok_or_else(|| DomainError::validation("The cast is empty"))?;
        if expected.id() != speaker {
            return Err(DomainError::validation(format!(
                "It is {}'s turn, not '{}'",
                expected.name(),
                speaker
            )));
        }

        let personality = Arc::clone(expected);
        self.turns.push(StoryTurn::bot(personality, text));
        self.next_speaker = (self.next_speaker + 1) % self.cast.len();
        Ok(self.last_turn())
    }

    /// Narration sets the scene without using up anyone's turn
    pub fn record_narration(&mut self, text: impl Into<String>) -> Result<&StoryTurn, DomainError> {
        if self.status != GameStatus::Playing {
            return Err(self.invalid("narrate"));
        }
        self.turns
            .push(StoryTurn::bot(Arc::clone(&NARRATOR_PERSONALITY), text));
        Ok(self.last_turn())
    }

    /// Editor recap, allowed during play and after the game ends
    pub fn record_summary(&mut self, text: impl Into<String>) -> Result<&StoryTurn, DomainError> {
        if !matches!(self.status, GameStatus::Playing | GameStatus::Finished) {
            return Err(self.invalid("summarize the story"));
        }
        self.turns
            .push(StoryTurn::summary(Arc::clone(&EDITOR_PERSONALITY), text));
        Ok(self.last_turn())
    }

    fn last_turn(&self) -> &StoryTurn {
        &self.turns[self.turns.len() - 1]
    }

    fn require_cast_changes(&self, action: &'static str) -> Result<(), DomainError> {
        if self.status.allows_cast_changes() {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> DomainError {
        DomainError::InvalidTransition {
            action,
            status: self.status,
        }
    }
}
