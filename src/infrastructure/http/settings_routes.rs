use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use crate::application::ports::outbound::SettingsError;
use crate::infrastructure::state::AppState;
use crate::domain::value_objects::LlmSettings;

pub fn settings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/settings", get(get_settings).put(update_settings))
        .route("/api/settings/reset", post(reset_settings))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<LlmSettings> {
    Json(state.settings_service.get().await)
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<LlmSettings>,
) -> Result<Json<LlmSettings>, (StatusCode, String)> {
    state
        .settings_service
        .update(settings.clone())
        .await
        .map_err(settings_error)?;
    Ok(Json(settings))
}

async fn reset_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LlmSettings>, (StatusCode, String)> {
    state
        .settings_service
        .reset()
        .await
        .map(Json)
        .map_err(settings_error)
}

fn settings_error(e: SettingsError) -> (StatusCode, String) {
    match e {
        SettingsError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}
