//! Outbound ports - Interfaces that the application requires from external systems

mod llm_port;
mod settings_port;

pub use llm_port::{LlmPort, LlmRequest, LlmResponse, SamplingOptions};
pub use settings_port::{SettingsError, SettingsRepositoryPort};
