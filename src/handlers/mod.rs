//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for user and operator commands
//! - Message handlers that feed text into the scenario engine

pub mod commands;
pub mod messages;

// Re-export commonly used handler functions
pub use commands::{Command, handle_command};
pub use messages::handle_message;
