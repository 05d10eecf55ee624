use std::sync::Arc;
use tokio::sync::RwLock;
use crate::application::ports::outbound::{SettingsRepositoryPort, SettingsError};
use crate::domain::value_objects::LlmSettings;

/// Receives settings changes so live clients can switch endpoint or model
pub trait SettingsListener: Send + Sync {
    fn settings_changed(&self, settings: &LlmSettings);
}

pub struct SettingsService {
    repository: Arc<dyn SettingsRepositoryPort>,
    cache: RwLock<Option<LlmSettings>>,
    listeners: Vec<Arc<dyn SettingsListener>>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepositoryPort>) -> Self {
        Self {
            repository,
            cache: RwLock::new(None),
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn SettingsListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Get current settings (cached)
    pub async fn get(&self) -> LlmSettings {
        let cache = self.cache.read().await;
        if let Some(settings) = &*cache {
            return settings.clone();
        }
        drop(cache);

        // Load from DB
        match self.repository.get().await {
            Ok(settings) => {
                *self.cache.write().await = Some(settings.clone());
                settings
            }
            Err(e) => {
                tracing::warn!("Falling back to environment settings: {}", e);
                LlmSettings::from_env()
            }
        }
    }

    /// Validate, persist, and broadcast new settings
    pub async fn update(&self, settings: LlmSettings) -> Result<(), SettingsError> {
        settings
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        self.repository.save(&settings).await?;
        self.notify(&settings);
        *self.cache.write().await = Some(settings);
        tracing::info!("Settings saved");
        Ok(())
    }

    /// Reset to env/defaults and clear DB values
    pub async fn reset(&self) -> Result<LlmSettings, SettingsError> {
        let settings = self.repository.reset().await?;
        self.notify(&settings);
        *self.cache.write().await = Some(settings.clone());
        Ok(settings)
    }

    fn notify(&self, settings: &LlmSettings) {
        for listener in &self.listeners {
            listener.settings_changed(settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::value_objects::EndpointType;

    #[derive(Default)]
    struct InMemorySettings {
        stored: Mutex<Option<LlmSettings>>,
        loads: Mutex<usize>,
    }

    #[async_trait]
    impl SettingsRepositoryPort for InMemorySettings {
        async fn get(&self) -> Result<LlmSettings, SettingsError> {
            *self.loads.lock().unwrap() += 1;
            Ok(self.stored.lock().unwrap().clone().unwrap_or_default())
        }

        async fn save(&self, settings: &LlmSettings) -> Result<(), SettingsError> {
            *self.stored.lock().unwrap() = Some(settings.clone());
            Ok(())
        }

        async fn reset(&self) -> Result<LlmSettings, SettingsError> {
            *self.stored.lock().unwrap() = None;
            Ok(LlmSettings::default())
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        seen: Mutex<Vec<LlmSettings>>,
    }

    impl SettingsListener for RecordingListener {
        fn settings_changed(&self, settings: &LlmSettings) {
            self.seen.lock().unwrap().push(settings.clone());
        }
    }

    fn local() -> LlmSettings {
        LlmSettings {
            endpoint_type: EndpointType::Local,
            model_name: "llama3.1".to_string(),
            local_endpoint: "http://localhost:11434".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_is_cached() {
        let repo = Arc::new(InMemorySettings::default());
        let service = SettingsService::new(repo.clone());

        service.get().await;
        service.get().await;
        assert_eq!(*repo.loads.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_persists_and_notifies() {
        let repo = Arc::new(InMemorySettings::default());
        let listener = Arc::new(RecordingListener::default());
        let service = SettingsService::new(repo.clone()).with_listener(listener.clone());

        service.update(local()).await.unwrap();

        assert_eq!(service.get().await, local());
        assert_eq!(repo.stored.lock().unwrap().clone(), Some(local()));
        assert_eq!(listener.seen.lock().unwrap().as_slice(), &[local()]);
    }

    #[tokio::test]
    async fn test_invalid_update_is_not_saved() {
        let repo = Arc::new(InMemorySettings::default());
        let service = SettingsService::new(repo.clone());

        let invalid = LlmSettings {
            local_endpoint: String::new(),
            ..local()
        };
        let err = service.update(invalid).await.unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(repo.stored.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_returns_defaults() {
        let repo = Arc::new(InMemorySettings::default());
        let service = SettingsService::new(repo.clone());
        service.update(local()).await.unwrap();

        let settings = service.reset().await.unwrap();
        assert_eq!(settings, LlmSettings::default());
        assert_eq!(service.get().await, LlmSettings::default());
    }
}
