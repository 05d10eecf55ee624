//! Story LLM Service - AI-generated story turns and editor summaries
//!
//! This service turns game state into LLM requests. It handles:
//!
//! - Asking a personality to continue the story with one or two sentences
//! - Asking the editor to retell the whole story in a blended first-person voice
//!
//! A failing backend never stops the game: the error is logged and a fixed
//! in-story apology line is returned instead.

use crate::application::ports::outbound::{LlmPort, LlmRequest};
use crate::application::services::llm::prompt_builder::{
    build_next_turn_prompt, build_summary_prompt, build_summary_system_prompt,
    IMPROV_SYSTEM_INSTRUCTION,
};
use crate::domain::entities::Personality;

pub const TURN_FALLBACK: &str = "I seem to have forgotten my lines... (An LLM error occurred).";
pub const SUMMARY_FALLBACK: &str =
    "The editor seems to be on a coffee break... (An LLM error occurred).";

/// Service for generating story content
///
/// # Example
///
/// ```ignore
/// let client = OllamaClient::new(LlmSettings::default());
/// let service = StoryLlmService::new(client);
///
/// let line = service
///     .generate_next_turn("A storm rolled in.", &pirate)
///     .await;
/// ```
pub struct StoryLlmService<L: LlmPort> {
    llm: L,
}

impl<L: LlmPort> StoryLlmService<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    #[cfg(test)]
    pub fn client(&self) -> &L {
        &self.llm
    }

    /// Generate the next one or two sentences in `personality`'s voice
    pub async fn generate_next_turn(&self, story_so_far: &str, personality: &Personality) -> String {
        let request = LlmRequest::new(build_next_turn_prompt(story_so_far, personality))
            .with_system_prompt(IMPROV_SYSTEM_INSTRUCTION)
            .with_temperature(0.9)
            .with_top_p(1.0)
            .with_top_k(1);

        match self.llm.generate(request).await {
            Ok(response) => {
                tracing::debug!(
                    personality = %personality.id(),
                    model = %response.model,
                    "Generated story turn"
                );
                response.content.trim().to_string()
            }
            Err(e) => {
                tracing::error!("Error calling LLM for story turn: {}", e);
                TURN_FALLBACK.to_string()
            }
        }
    }

    /// Retell `full_story` as a single first-person passage blending the given prompts
    pub async fn summarize_story(&self, full_story: &str, personality_prompts: &[String]) -> String {
        let request = LlmRequest::new(build_summary_prompt(full_story))
            .with_system_prompt(build_summary_system_prompt(personality_prompts))
            .with_temperature(0.75);

        match self.llm.generate(request).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                tracing::error!("Error calling LLM for summarization: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::application::ports::outbound::LlmResponse;

    /// Scripted LLM that records requests and replays canned replies
    pub(crate) struct ScriptedLlm {
        replies: Mutex<Vec<Result<String, String>>>,
        pub requests: Mutex<Vec<LlmRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedLlm {
        pub fn new(replies: Vec<Result<String, String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        /// Wait before answering, like a model that takes a while to respond
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait::async_trait]
    impl LlmPort for ScriptedLlm {
        type Error = std::io::Error;

        async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, Self::Error> {
            self.requests.lock().unwrap().push(request);
            let reply = {
                let mut replies = self.replies.lock().unwrap();
                if replies.is_empty() {
                    Ok(String::new())
                } else {
                    replies.remove(0)
                }
            };
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            reply
                .map(|content| LlmResponse {
                    content,
                    model: "mock".to_string(),
                })
                .map_err(std::io::Error::other)
        }
    }

    fn pirate() -> Personality {
        Personality::ai("A Pirate Captain", "obsessed with treasure", "🧙").unwrap()
    }

    #[tokio::test]
    async fn test_next_turn_trims_and_sets_sampling() {
        let service = StoryLlmService::new(ScriptedLlm::new(vec![Ok(
            "  Arrr, the map leads north!\n".to_string(),
        )]));

        let line = service.generate_next_turn("We found a map.", &pirate()).await;
        assert_eq!(line, "Arrr, the map leads north!");

        let requests = service.client().requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.system_prompt.as_deref(), Some(IMPROV_SYSTEM_INSTRUCTION));
        assert_eq!(request.options.temperature, Some(0.9));
        assert_eq!(request.options.top_p, Some(1.0));
        assert_eq!(request.options.top_k, Some(1));
        assert!(request.prompt.contains("We found a map."));
    }

    #[tokio::test]
    async fn test_next_turn_falls_back_on_error() {
        let service = StoryLlmService::new(ScriptedLlm::new(vec![Err("connection refused".to_string())]));
        let line = service.generate_next_turn("", &pirate()).await;
        assert_eq!(line, TURN_FALLBACK);
    }

    #[tokio::test]
    async fn test_summary_uses_blended_persona() {
        let service = StoryLlmService::new(ScriptedLlm::new(vec![Ok(
            "I sailed north and found gold.".to_string(),
        )]));

        let prompts = vec!["obsessed with treasure".to_string()];
        let summary = service.summarize_story("We found a map.", &prompts).await;
        assert_eq!(summary, "I sailed north and found gold.");

        let requests = service.client().requests.lock().unwrap();
        let request = &requests[0];
        assert!(request
            .system_prompt
            .as_deref()
            .unwrap_or_default()
            .contains("- obsessed with treasure"));
        assert_eq!(request.options.temperature, Some(0.75));
        assert_eq!(request.options.top_k, None);
    }

    #[tokio::test]
    async fn test_summary_falls_back_on_error() {
        let service = StoryLlmService::new(ScriptedLlm::new(vec![Err("timeout".to_string())]));
        let summary = service.summarize_story("story", &[]).await;
        assert_eq!(summary, SUMMARY_FALLBACK);
    }
}
