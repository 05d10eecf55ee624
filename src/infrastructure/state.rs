//! Shared application state

use std::sync::Arc;

use anyhow::Result;
use sqlx::SqlitePool;

use crate::application::ports::outbound::SettingsRepositoryPort;
use crate::application::services::{GameService, SettingsService, StoryLlmService};
use crate::domain::value_objects::LlmSettings;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ollama::OllamaClient;
use crate::infrastructure::persistence::{self, SqliteSettingsRepository};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub settings_service: SettingsService,
    pub game_service: GameService<OllamaClient>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let pool = persistence::connect(&config.database_url).await?;
        Self::with_pool(config, pool).await
    }

    pub async fn with_pool(config: AppConfig, pool: SqlitePool) -> Result<Self> {
        let repository = Arc::new(SqliteSettingsRepository::new(pool).await?);

        // Start the LLM client on whatever was saved last
        let settings = repository.get().await.unwrap_or_else(|e| {
            tracing::warn!("Could not load saved settings: {}", e);
            LlmSettings::from_env()
        });
        tracing::info!(
            "  LLM: {} model {} at {}",
            settings.endpoint_type.as_str(),
            settings.model_name,
            settings.local_endpoint
        );

        let llm_client = OllamaClient::new(settings);
        let settings_service =
            SettingsService::new(repository).with_listener(Arc::new(llm_client.clone()));
        let game_service = GameService::new(StoryLlmService::new(llm_client));

        Ok(Self {
            config,
            settings_service,
            game_service,
        })
    }
}
