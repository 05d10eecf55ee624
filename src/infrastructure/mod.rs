//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapter for saved settings
//! - HTTP: REST API routes
//! - Ollama: LLM integration for story turns and summaries
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod ollama;
pub mod persistence;
pub mod state;
