//! Catalog API routes
//!
//! Read-only views of the built-in presets, avatars, and special personalities.

use axum::Json;
use serde::Serialize;

use crate::domain::catalog::{
    AVATARS, EDITOR_PERSONALITY, FAMOUS_PERSONALITIES, NARRATOR_PERSONALITY, USER_PERSONALITY,
};
use crate::domain::entities::Personality;

#[derive(Debug, Serialize)]
pub struct PresetResponse {
    pub index: usize,
    pub name: &'static str,
    pub prompt: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SpecialPersonalitiesResponse {
    pub editor: Personality,
    pub user: Personality,
    pub narrator: Personality,
}

/// List presets in catalog order
pub async fn list_presets() -> Json<Vec<PresetResponse>> {
    Json(
        FAMOUS_PERSONALITIES
            .iter()
            .enumerate()
            .map(|(index, preset)| PresetResponse {
                index,
                name: preset.name,
                prompt: preset.prompt,
            })
            .collect(),
    )
}

pub async fn list_avatars() -> Json<Vec<&'static str>> {
    Json(AVATARS.to_vec())
}

pub async fn special_personalities() -> Json<SpecialPersonalitiesResponse> {
    Json(SpecialPersonalitiesResponse {
        editor: (**EDITOR_PERSONALITY).clone(),
        user: (**USER_PERSONALITY).clone(),
        narrator: (**NARRATOR_PERSONALITY).clone(),
    })
}
