use async_trait::async_trait;
use sqlx::SqlitePool;
use crate::application::ports::outbound::{SettingsRepositoryPort, SettingsError};
use crate::domain::value_objects::LlmSettings;

pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Create table if not exists
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SettingsRepositoryPort for SqliteSettingsRepository {
    async fn get(&self) -> Result<LlmSettings, SettingsError> {
        let mut settings = LlmSettings::from_env(); // Start with env defaults

        // Override with DB values
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))?;

        for (key, value) in rows {
            match key.as_str() {
                "endpoint_type" => match value.parse() {
                    Ok(v) => settings.endpoint_type = v,
                    Err(e) => tracing::warn!("Ignoring stored endpoint_type: {}", e),
                },
                "model_name" => settings.model_name = value,
                "local_endpoint" => settings.local_endpoint = value,
                _ => {}
            }
        }

        Ok(settings)
    }

    async fn save(&self, settings: &LlmSettings) -> Result<(), SettingsError> {
        let pairs = [
            ("endpoint_type", settings.endpoint_type.as_str().to_string()),
            ("model_name", settings.model_name.clone()),
            ("local_endpoint", settings.local_endpoint.clone()),
        ];

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))?;

        for (key, value) in pairs {
            sqlx::query("INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)")
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(|e| SettingsError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))
    }

    async fn reset(&self) -> Result<LlmSettings, SettingsError> {
        sqlx::query("DELETE FROM settings")
            .execute(&self.pool)
            .await
            .map_err(|e| SettingsError::Database(e.to_string()))?;

        Ok(LlmSettings::from_env())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::domain::value_objects::EndpointType;

    async fn repository() -> SqliteSettingsRepository {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteSettingsRepository::new(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let repo = repository().await;
        let settings = LlmSettings {
            endpoint_type: EndpointType::Local,
            model_name: "llama3.1".to_string(),
            local_endpoint: "http://localhost:11434".to_string(),
        };

        repo.save(&settings).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), settings);

        // Saving again overwrites rather than duplicating keys
        let updated = LlmSettings {
            model_name: "mistral".to_string(),
            ..settings
        };
        repo.save(&updated).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_reset_clears_stored_values() {
        let repo = repository().await;
        let settings = LlmSettings {
            endpoint_type: EndpointType::OpenAi,
            model_name: "gpt-4o".to_string(),
            local_endpoint: String::new(),
        };
        repo.save(&settings).await.unwrap();

        repo.reset().await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM settings")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
