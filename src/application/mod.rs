//! Application layer - Use cases orchestrating the domain
//!
//! - Ports: traits the infrastructure implements (LLM, settings storage)
//! - Services: story generation, game sessions, settings

pub mod ports;
pub mod services;
