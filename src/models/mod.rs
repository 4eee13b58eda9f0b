//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod scenario;
pub mod progress;
pub mod message;
pub mod user;

// Re-export commonly used models
pub use scenario::{Scenario, ScenarioRecord, Step, HttpMethod};
pub use progress::{UserProgress, ProgressPhase, Variables};
pub use message::{LogKind, MessageLogEntry, NewLogEntry};
pub use user::{User, CreateUserRequest};
