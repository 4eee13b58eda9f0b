//! Message handlers module
//!
//! Feeds private text messages into the scenario engine

use teloxide::{Bot, types::Message};
use tracing::{debug, error};
use crate::models::CreateUserRequest;
use crate::services::ServiceFactory;
use crate::state::HandleOutcome;
use crate::utils::errors::{BotError, Result};

/// Handle incoming text messages
pub async fn handle_message(
    _bot: Bot,
    msg: Message,
    services: ServiceFactory,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        BotError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    // Scenarios only run in private chats
    if !chat_id.is_user() {
        debug!(user_id = user_id, chat_id = ?chat_id, "Ignoring message outside private chat");
        return Ok(());
    }

    let Some(text) = msg.text() else {
        debug!(user_id = user_id, "Ignoring non-text message");
        return Ok(());
    };

    let profile = CreateUserRequest::from_profile(
        user_id,
        user.username.clone(),
        &user.first_name,
        user.last_name.as_deref(),
    );
    if let Err(e) = services.user_service.register_or_get_user(profile).await {
        error!(user_id = user_id, error = %e, "Failed to record user profile");
    }

    let outcome = services.engine.on_inbound_text(user_id, text).await?;
    match outcome {
        HandleOutcome::NoScenario => debug!(user_id = user_id, "Message logged without a running scenario"),
        HandleOutcome::AwaitingInput { step } => debug!(user_id = user_id, step = step, "Waiting for user input"),
        HandleOutcome::Completed => debug!(user_id = user_id, "Scenario completed"),
    }

    Ok(())
}
