use async_trait::async_trait;
use crate::domain::value_objects::LlmSettings;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[async_trait]
pub trait SettingsRepositoryPort: Send + Sync {
    async fn get(&self) -> Result<LlmSettings, SettingsError>;
    async fn save(&self, settings: &LlmSettings) -> Result<(), SettingsError>;
    async fn reset(&self) -> Result<LlmSettings, SettingsError>;
}
