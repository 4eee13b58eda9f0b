//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod scenario;
pub mod message;
pub mod settings;

// Re-export repositories
pub use user::UserRepository;
pub use scenario::ScenarioRepository;
pub use message::MessageRepository;
pub use settings::{SettingsRepository, CURRENT_SCENARIO_KEY};
