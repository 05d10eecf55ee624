//! Game Service - session registry and the game's use cases
//!
//! Sessions live in memory for the lifetime of the process. The registry lock
//! is never held while waiting on the LLM: the service reads what it needs,
//! releases the lock, generates, then re-acquires it to record the turn. Only
//! one AI turn per session is generated at a time; if the session changed in
//! between, the aggregate rejects the stale turn.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::sync::RwLock;

use crate::application::ports::outbound::LlmPort;
use crate::application::services::llm_service::StoryLlmService;
use crate::domain::aggregates::GameSession;
use crate::domain::catalog::{self, USER_PERSONALITY};
use crate::domain::entities::{Personality, StoryTurn};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{GameStatus, PersonalityId, SessionId};

#[derive(Debug, thiserror::Error)]
pub enum GameServiceError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("No preset at index {0}")]
    UnknownPreset(usize),
    #[error("It is the player's turn")]
    AwaitingPlayer,
    #[error("A turn is already being generated for session {0}")]
    TurnInProgress(SessionId),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A new cast member: either a catalog preset or a custom personality
#[derive(Debug, Clone)]
pub enum CastMemberRequest {
    Preset(usize),
    Custom {
        name: String,
        prompt: String,
        avatar: Option<String>,
    },
}

pub struct GameService<L: LlmPort> {
    story: StoryLlmService<L>,
    sessions: RwLock<HashMap<SessionId, GameSession>>,
    turns_in_flight: Mutex<HashSet<SessionId>>,
}

/// Marks a session as generating an AI turn until dropped
struct TurnInFlight<'a> {
    in_flight: &'a Mutex<HashSet<SessionId>>,
    id: SessionId,
}

impl<'a> TurnInFlight<'a> {
    fn claim(in_flight: &'a Mutex<HashSet<SessionId>>, id: SessionId) -> Option<Self> {
        let claimed = in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id);
        // Built only on success; dropping an unclaimed guard would free another caller's claim
        claimed.then(|| Self { in_flight, id })
    }
}

impl Drop for TurnInFlight<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.id);
    }
}

impl<L: LlmPort> GameService<L> {
    pub fn new(story: StoryLlmService<L>) -> Self {
        Self {
            story,
            sessions: RwLock::new(HashMap::new()),
            turns_in_flight: Mutex::new(HashSet::new()),
        }
    }

    #[cfg(test)]
    pub fn story(&self) -> &StoryLlmService<L> {
        &self.story
    }

    pub async fn create_session(&self) -> GameSession {
        let session = GameSession::new();
        tracing::info!(session = %session.id(), "Created game session");
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        session
    }

    pub async fn get_session(&self, id: SessionId) -> Result<GameSession, GameServiceError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GameServiceError::SessionNotFound(id))
    }

    /// Drop a session and every turn in it
    pub async fn end_session(&self, id: SessionId) -> Result<(), GameServiceError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(GameServiceError::SessionNotFound(id));
        }
        tracing::info!(session = %id, "Ended game session");
        Ok(())
    }

    pub async fn add_cast_member(
        &self,
        id: SessionId,
        request: CastMemberRequest,
    ) -> Result<Personality, GameServiceError> {
        let personality = {
            let mut rng = rand::thread_rng();
            match request {
                CastMemberRequest::Preset(index) => catalog::preset(index)
                    .ok_or(GameServiceError::UnknownPreset(index))?
                    .instantiate(&mut rng)?,
                CastMemberRequest::Custom {
                    name,
                    prompt,
                    avatar,
                } => {
                    let avatar = avatar
                        .filter(|a| !a.is_empty())
                        .unwrap_or_else(|| catalog::random_avatar(&mut rng).to_string());
                    Personality::ai(name, prompt, avatar)?
                }
            }
        };

        let added = self
            .with_session(id, |session| session.add_cast_member(personality))
            .await?;
        tracing::debug!(session = %id, personality = %added.id(), "Added cast member");
        Ok((*added).clone())
    }

    pub async fn remove_cast_member(
        &self,
        id: SessionId,
        personality_id: &PersonalityId,
    ) -> Result<(), GameServiceError> {
        self.with_session(id, |session| session.remove_cast_member(personality_id))
            .await?;
        Ok(())
    }

    pub async fn begin_editing_cast(&self, id: SessionId) -> Result<GameStatus, GameServiceError> {
        self.transition(id, GameSession::begin_editing_cast).await
    }

    pub async fn finish_editing_cast(&self, id: SessionId) -> Result<GameStatus, GameServiceError> {
        self.transition(id, GameSession::finish_editing_cast).await
    }

    pub async fn start(&self, id: SessionId) -> Result<GameStatus, GameServiceError> {
        self.transition(id, GameSession::start).await
    }

    pub async fn finish(&self, id: SessionId) -> Result<GameStatus, GameServiceError> {
        self.transition(id, GameSession::finish).await
    }

    /// Let the AI cast member whose turn it is add to the story
    pub async fn take_ai_turn(&self, id: SessionId) -> Result<StoryTurn, GameServiceError> {
        let (_claim, speaker, story_so_far) = {
            let sessions = self.sessions.read().await;
            let session = sessions
                .get(&id)
                .ok_or(GameServiceError::SessionNotFound(id))?;
            if session.status() != GameStatus::Playing {
                return Err(DomainError::InvalidTransition {
                    action: "take a turn",
                    status: session.status(),
                }
                .into());
            }
            let speaker = session
                .next_speaker()
                .cloned()
                .ok_or_else(|| DomainError::validation("The cast is empty"))?;
            if !speaker.is_ai() {
                return Err(GameServiceError::AwaitingPlayer);
            }
            let claim = TurnInFlight::claim(&self.turns_in_flight, id)
                .ok_or(GameServiceError::TurnInProgress(id))?;
            (claim, speaker, session.story_so_far())
        };

        let text = self.story.generate_next_turn(&story_so_far, &speaker).await;

        self.with_session(id, |session| session.record_turn(speaker.id(), text).cloned())
            .await
    }

    /// Record the human player's line
    pub async fn take_player_turn(
        &self,
        id: SessionId,
        text: impl Into<String>,
    ) -> Result<StoryTurn, GameServiceError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation("Turn text must not be empty").into());
        }
        self.with_session(id, |session| {
            session.record_turn(USER_PERSONALITY.id(), text.trim()).cloned()
        })
        .await
    }

    pub async fn narrate(
        &self,
        id: SessionId,
        text: impl Into<String>,
    ) -> Result<StoryTurn, GameServiceError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation("Narration must not be empty").into());
        }
        self.with_session(id, |session| session.record_narration(text.trim()).cloned())
            .await
    }

    /// Have the editor recap the story so far
    pub async fn summarize(&self, id: SessionId) -> Result<StoryTurn, GameServiceError> {
        let (story_so_far, prompts) = {
            let sessions = self.sessions.read().await;
            let session = sessions
                .get(&id)
                .ok_or(GameServiceError::SessionNotFound(id))?;
            if !matches!(session.status(), GameStatus::Playing | GameStatus::Finished) {
                return Err(DomainError::InvalidTransition {
                    action: "summarize the story",
                    status: session.status(),
                }
                .into());
            }
            (session.story_so_far(), session.personality_prompts())
        };

        let summary = self.story.summarize_story(&story_so_far, &prompts).await;

        self.with_session(id, |session| session.record_summary(summary).cloned())
            .await
    }

    async fn transition(
        &self,
        id: SessionId,
        change: fn(&mut GameSession) -> Result<(), DomainError>,
    ) -> Result<GameStatus, GameServiceError> {
        let status = self
            .with_session(id, |session| {
                change(session)?;
                Ok(session.status())
            })
            .await?;
        tracing::info!(session = %id, status = %status, "Game status changed");
        Ok(status)
    }

    async fn with_session<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut GameSession) -> Result<T, DomainError>,
    ) -> Result<T, GameServiceError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(GameServiceError::SessionNotFound(id))?;
        Ok(f(session)?)
    }
}
