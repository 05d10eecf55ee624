//! Ollama client for story generation
//!
//! Talks to the native `/api/generate` endpoint, which streams its answer as
//! newline-delimited JSON objects each carrying a `response` fragment.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{LlmPort, LlmRequest, LlmResponse, SamplingOptions};
use crate::application::services::SettingsListener;
use crate::domain::value_objects::{EndpointType, LlmSettings};

/// Client for the Ollama API
///
/// Clones share the same settings, so a settings update reaches every holder.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    settings: Arc<RwLock<LlmSettings>>,
}

impl OllamaClient {
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            client: Client::new(),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn settings(&self) -> LlmSettings {
        self.settings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn update_settings(&self, settings: LlmSettings) {
        *self
            .settings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings;
    }
}

impl SettingsListener for OllamaClient {
    fn settings_changed(&self, settings: &LlmSettings) {
        tracing::info!(
            endpoint_type = settings.endpoint_type.as_str(),
            model = %settings.model_name,
            "LLM client switching settings"
        );
        self.update_settings(settings.clone());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Invalid response line: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("No client available for endpoint type '{}'", .0.as_str())]
    UnsupportedEndpoint(EndpointType),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    options: &'a SamplingOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

/// Fold one NDJSON line into the accumulated text
fn append_line(line: &[u8], content: &mut String) -> Result<(), LlmError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(());
    }
    let chunk: GenerateChunk = serde_json::from_slice(line)?;
    if let Some(error) = chunk.error {
        return Err(LlmError::ApiError(error));
    }
    content.push_str(&chunk.response);
    Ok(())
}

#[async_trait]
impl LlmPort for OllamaClient {
    type Error = LlmError;

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, Self::Error> {
        let settings = self.settings();
        if settings.endpoint_type != EndpointType::Local {
            return Err(LlmError::UnsupportedEndpoint(settings.endpoint_type));
        }

        let body = GenerateRequest {
            model: &settings.model_name,
            prompt: &request.prompt,
            system: request.system_prompt.as_deref(),
            options: &request.options,
        };

        let response = self
            .client
            .post(format!(
                "{}/api/generate",
                settings.local_endpoint.trim_end_matches('/')
            ))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(LlmError::ApiError(error_text));
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut content = String::new();

        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
            while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                append_line(&line, &mut content)?;
            }
        }
        append_line(&buffer, &mut content)?;

        Ok(LlmResponse {
            content: content.trim().to_string(),
            model: settings.model_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn local_settings(endpoint: &str) -> LlmSettings {
        LlmSettings {
            endpoint_type: EndpointType::Local,
            model_name: "llama3.1".to_string(),
            local_endpoint: endpoint.to_string(),
        }
    }

    #[test]
    fn test_append_line() {
        let mut content = String::new();
        append_line(br#"{"response":"Once ","done":false}"#, &mut content).unwrap();
        append_line(b"   \n", &mut content).unwrap();
        append_line(br#"{"response":"upon a time","done":true}"#, &mut content).unwrap();
        assert_eq!(content, "Once upon a time");

        let err = append_line(br#"{"error":"model not found"}"#, &mut content).unwrap_err();
        assert!(matches!(err, LlmError::ApiError(msg) if msg == "model not found"));

        assert!(append_line(b"not json", &mut content).is_err());
    }

    #[tokio::test]
    async fn test_generate_concatenates_stream() {
        let server = MockServer::start().await;
        let body = concat!(
            "{\"model\":\"llama3.1\",\"response\":\"Arrr, \",\"done\":false}\n",
            "{\"model\":\"llama3.1\",\"response\":\"the sea calls!\",\"done\":false}\n",
            "{\"model\":\"llama3.1\",\"response\":\"\",\"done\":true}\n",
        );

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3.1",
                "system": "Be a pirate",
                "options": { "temperature": 0.9, "top_k": 1 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::new(local_settings(&format!("{}/", server.uri())));
        let request = LlmRequest::new("Continue the story")
            .with_system_prompt("Be a pirate")
            .with_temperature(0.9)
            .with_top_k(1);

        let response = client.generate(request).await.unwrap();
        assert_eq!(response.content, "Arrr, the sea calls!");
        assert_eq!(response.model, "llama3.1");
    }

    #[tokio::test]
    async fn test_generate_reports_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model 'llama3.1' not found"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(local_settings(&server.uri()));
        let err = client.generate(LlmRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, LlmError::ApiError(msg) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_non_local_endpoint_is_unsupported() {
        let client = OllamaClient::new(LlmSettings::default());
        let err = client.generate(LlmRequest::new("hi")).await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::UnsupportedEndpoint(EndpointType::HuggingFace)
        ));
    }

    #[tokio::test]
    async fn test_settings_listener_switches_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"response\":\"ok\"}"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(LlmSettings::default());
        let shared = client.clone();
        shared.settings_changed(&local_settings(&server.uri()));

        assert_eq!(client.settings().endpoint_type, EndpointType::Local);
        let response = client.generate(LlmRequest::new("hi")).await.unwrap();
        assert_eq!(response.content, "ok");
    }
}
