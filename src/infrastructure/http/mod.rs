//! HTTP REST API routes

mod catalog_routes;
mod session_routes;
mod settings_routes;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Catalog routes
        .route("/api/catalog/presets", get(catalog_routes::list_presets))
        .route("/api/catalog/avatars", get(catalog_routes::list_avatars))
        .route(
            "/api/catalog/special",
            get(catalog_routes::special_personalities),
        )
        // Session routes
        .route("/api/sessions", post(session_routes::create_session))
        .route(
            "/api/sessions/{id}",
            get(session_routes::get_session).delete(session_routes::end_session),
        )
        .route(
            "/api/sessions/{id}/cast",
            post(session_routes::add_cast_member),
        )
        .route(
            "/api/sessions/{id}/cast/{personality_id}",
            delete(session_routes::remove_cast_member),
        )
        .route(
            "/api/sessions/{id}/cast/edit",
            post(session_routes::begin_editing_cast),
        )
        .route(
            "/api/sessions/{id}/cast/done",
            post(session_routes::finish_editing_cast),
        )
        .route("/api/sessions/{id}/start", post(session_routes::start_game))
        .route("/api/sessions/{id}/finish", post(session_routes::finish_game))
        .route(
            "/api/sessions/{id}/turns/next",
            post(session_routes::next_turn),
        )
        .route(
            "/api/sessions/{id}/turns/user",
            post(session_routes::player_turn),
        )
        .route("/api/sessions/{id}/narrate", post(session_routes::narrate))
        .route("/api/sessions/{id}/summary", post(session_routes::summarize))
        // Settings routes
        .merge(settings_routes::settings_routes())
}
