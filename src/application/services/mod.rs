//! Application services - Use case implementations
//!
//! Each service follows hexagonal architecture principles, depending on
//! outbound ports rather than concrete adapters.

pub mod game_service;
pub mod llm;
pub mod llm_service;
pub mod settings_service;

pub use game_service::{CastMemberRequest, GameService, GameServiceError};
pub use llm_service::StoryLlmService;
pub use settings_service::{SettingsListener, SettingsService};
