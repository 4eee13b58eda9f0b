//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod help;
pub mod operator;

use teloxide::{Bot, types::Message, prelude::*, utils::command::BotCommands};
use tracing::warn;
use crate::handlers::messages;
use crate::utils::errors::Result;
use crate::services::ServiceFactory;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "ScenarioBot commands:")]
pub enum Command {
    #[command(description = "Start or continue the conversation")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "List scenarios (operator only)")]
    Scenarios,
    #[command(description = "Switch the current scenario (operator only)")]
    Use(String),
    #[command(description = "Create or replace a scenario (operator only)")]
    Define(String),
    #[command(description = "Show a user's progress (operator only)")]
    Progress(String),
    #[command(description = "Restart a user's scenario (operator only)")]
    Reset(String),
    #[command(description = "Send a message to a user (operator only)")]
    Say(String),
    #[command(description = "List users (operator only)")]
    Users,
    #[command(description = "Show a user's recent messages (operator only)")]
    History(String),
}

impl Command {
    /// Commands anyone may use
    pub fn is_public(&self) -> bool {
        matches!(self, Command::Start | Command::Help)
    }
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
) -> Result<()> {
    let sender_id = msg.from.as_ref().map(|user| user.id.0 as i64);
    let is_operator = sender_id.map(|id| services.settings.is_operator(id)).unwrap_or(false);

    if !cmd.is_public() && !is_operator {
        warn!(user_id = ?sender_id, command = ?cmd, "Operator command from non-operator");
        bot.send_message(msg.chat.id, "❌ This command is only available to operators").await?;
        return Ok(());
    }

    let operator_id = sender_id.unwrap_or_default();

    match cmd {
        // /start counts as an ordinary message so a scenario can begin with it
        Command::Start => messages::handle_message(bot, msg, services).await,
        Command::Help => help::handle_help(bot, msg, is_operator).await,
        Command::Scenarios => operator::handle_scenarios(bot, msg, services).await,
        Command::Use(name) => operator::handle_use(bot, msg, services, operator_id, name).await,
        Command::Define(args) => operator::handle_define(bot, msg, services, operator_id, args).await,
        Command::Progress(args) => operator::handle_progress(bot, msg, services, args).await,
        Command::Reset(args) => operator::handle_reset(bot, msg, services, operator_id, args).await,
        Command::Say(args) => operator::handle_say(bot, msg, services, operator_id, args).await,
        Command::Users => operator::handle_users(bot, msg, services).await,
        Command::History(args) => operator::handle_history(bot, msg, services, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "scenariobot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/use welcome", "scenariobot").unwrap(), Command::Use("welcome".to_string()));
        assert_eq!(
            Command::parse("/say 42 hello there", "scenariobot").unwrap(),
            Command::Say("42 hello there".to_string())
        );
    }

    #[test]
    fn test_public_commands() {
        assert!(Command::Start.is_public());
        assert!(Command::Help.is_public());
        assert!(!Command::Users.is_public());
        assert!(!Command::Reset("1".to_string()).is_public());
    }
}
