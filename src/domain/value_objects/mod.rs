//! Value objects - Immutable objects defined by their attributes

mod game_status;
mod ids;
mod settings;

pub use game_status::GameStatus;
pub use ids::*;
pub use settings::{EndpointType, LlmSettings};
