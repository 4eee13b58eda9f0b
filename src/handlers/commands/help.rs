//! Help command handler

use teloxide::{Bot, types::Message, prelude::*};
use crate::utils::errors::Result;

/// Help text; operators also see the operator commands
pub fn help_text(is_operator: bool) -> String {
    let mut text = String::from(
        "🤖 ScenarioBot Help\n\n\
        /start - Start or continue the conversation\n\
        /help - Show this help message\n",
    );

    if is_operator {
        text.push_str(
            "\nOperator commands:\n\
            /scenarios - List scenarios\n\
            /use <name> - Switch the current scenario\n\
            /define <name> <json steps> - Create or replace a scenario\n\
            /progress <user_id> - Show a user's progress\n\
            /reset <user_id> - Restart a user's scenario\n\
            /say <user_id> <text> - Message a user\n\
            /users - List users\n\
            /history <user_id> - Show recent messages\n",
        );
    }

    text
}

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message, is_operator: bool) -> Result<()> {
    bot.send_message(msg.chat.id, help_text(is_operator)).await?;
    Ok(())
}
