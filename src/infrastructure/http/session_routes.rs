//! Game session API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{CastMemberRequest, GameServiceError};
use crate::domain::aggregates::GameSession;
use crate::domain::entities::{Personality, StoryTurn};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{GameStatus, PersonalityId, SessionId};
use crate::infrastructure::state::AppState;

/// Either a preset index or a fully custom personality
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddCastMemberRequest {
    Preset {
        preset: usize,
    },
    Custom {
        name: String,
        #[serde(default)]
        prompt: String,
        #[serde(default)]
        avatar: Option<String>,
    },
}

impl From<AddCastMemberRequest> for CastMemberRequest {
    fn from(request: AddCastMemberRequest) -> Self {
        match request {
            AddCastMemberRequest::Preset { preset } => CastMemberRequest::Preset(preset),
            AddCastMemberRequest::Custom {
                name,
                prompt,
                avatar,
            } => CastMemberRequest::Custom {
                name,
                prompt,
                avatar,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub status: GameStatus,
    pub cast: Vec<Arc<Personality>>,
    pub turns: Vec<StoryTurn>,
    pub next_speaker: Option<PersonalityId>,
    pub created_at: String,
}

impl From<GameSession> for SessionResponse {
    fn from(session: GameSession) -> Self {
        Self {
            id: session.id(),
            status: session.status(),
            cast: session.cast().to_vec(),
            turns: session.turns().to_vec(),
            next_speaker: session.next_speaker().map(|p| p.id().clone()),
            created_at: session.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: GameStatus,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn api_error(e: GameServiceError) -> (StatusCode, String) {
    let status = match &e {
        GameServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        GameServiceError::UnknownPreset(_) => StatusCode::BAD_REQUEST,
        GameServiceError::AwaitingPlayer | GameServiceError::TurnInProgress(_) => {
            StatusCode::CONFLICT
        }
        GameServiceError::Domain(domain) => match domain {
            DomainError::Validation(_) | DomainError::ReservedPersonality(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::InvalidTransition { .. } | DomainError::DuplicatePersonality(_) => {
                StatusCode::CONFLICT
            }
            DomainError::UnknownPersonality(_) => StatusCode::NOT_FOUND,
        },
    };
    (status, e.to_string())
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.game_service.create_session().await;
    (StatusCode::CREATED, Json(session.into()))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionResponse> {
    state
        .game_service
        .get_session(SessionId::from_uuid(id))
        .await
        .map(|session| Json(session.into()))
        .map_err(api_error)
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .game_service
        .end_session(SessionId::from_uuid(id))
        .await
        .map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_cast_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddCastMemberRequest>,
) -> Result<(StatusCode, Json<Personality>), (StatusCode, String)> {
    let personality = state
        .game_service
        .add_cast_member(SessionId::from_uuid(id), request.into())
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(personality)))
}

pub async fn remove_cast_member(
    State(state): State<Arc<AppState>>,
    Path((id, personality_id)): Path<(Uuid, String)>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .game_service
        .remove_cast_member(SessionId::from_uuid(id), &PersonalityId::new(personality_id))
        .await
        .map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn begin_editing_cast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusResponse> {
    status_response(state.game_service.begin_editing_cast(SessionId::from_uuid(id)).await)
}

pub async fn finish_editing_cast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusResponse> {
    status_response(state.game_service.finish_editing_cast(SessionId::from_uuid(id)).await)
}

pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusResponse> {
    status_response(state.game_service.start(SessionId::from_uuid(id)).await)
}

pub async fn finish_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusResponse> {
    status_response(state.game_service.finish(SessionId::from_uuid(id)).await)
}

/// Ask the AI cast member whose turn it is for the next line
pub async fn next_turn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StoryTurn> {
    state
        .game_service
        .take_ai_turn(SessionId::from_uuid(id))
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn player_turn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<TextRequest>,
) -> ApiResult<StoryTurn> {
    state
        .game_service
        .take_player_turn(SessionId::from_uuid(id), request.text)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn narrate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<TextRequest>,
) -> ApiResult<StoryTurn> {
    state
        .game_service
        .narrate(SessionId::from_uuid(id), request.text)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StoryTurn> {
    state
        .game_service
        .summarize(SessionId::from_uuid(id))
        .await
        .map(Json)
        .map_err(api_error)
}

fn status_response(result: Result<GameStatus, GameServiceError>) -> ApiResult<StatusResponse> {
    result
        .map(|status| Json(StatusResponse { status }))
        .map_err(api_error)
}
