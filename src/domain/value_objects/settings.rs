//! LLM endpoint settings value object
//!
//! # Architectural Note (Settings Serialization)
//!
//! LlmSettings includes serde derives because:
//! 1. Settings are stored in SQLite as key-value pairs
//! 2. Settings are transmitted via REST API for the settings page
//! 3. The JSON schema IS the API contract for settings

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Which kind of LLM backend generates story turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointType {
    HuggingFace,
    /// Self-hosted Ollama server at `local_endpoint`
    Local,
    OpenAi,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::HuggingFace => "huggingface",
            EndpointType::Local => "local",
            EndpointType::OpenAi => "openai",
        }
    }
}

impl std::str::FromStr for EndpointType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "huggingface" => Ok(EndpointType::HuggingFace),
            "local" => Ok(EndpointType::Local),
            "openai" => Ok(EndpointType::OpenAi),
            other => Err(format!("Unknown endpoint type: {}", other)),
        }
    }
}

/// Configurable LLM endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSettings {
    pub endpoint_type: EndpointType,
    pub model_name: String,
    #[serde(default)]
    pub local_endpoint: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint_type: EndpointType::HuggingFace,
            model_name: "google/flan-t5-large".to_string(),
            local_endpoint: "http://localhost:8000".to_string(),
        }
    }
}

impl LlmSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint_type: env_or("YESAND_ENDPOINT_TYPE", defaults.endpoint_type),
            model_name: env_or("YESAND_MODEL_NAME", defaults.model_name),
            local_endpoint: env_or("YESAND_LOCAL_ENDPOINT", defaults.local_endpoint),
        }
    }

    /// Check the settings form rules before they are saved
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.endpoint_type == EndpointType::Local && self.local_endpoint.trim().is_empty() {
            return Err(DomainError::validation(
                "Local endpoint URL is required for local LLM!",
            ));
        }
        if self.model_name.trim().is_empty() {
            return Err(DomainError::validation("Model name is required!"));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
