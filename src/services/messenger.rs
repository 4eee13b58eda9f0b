//! Outbound message delivery
//!
//! The engine only needs "push this text to that user"; the Telegram
//! implementation sends it to the user's private chat.

use async_trait::async_trait;
use teloxide::{Bot, prelude::Requester, types::ChatId};
use tracing::debug;
use crate::utils::errors::Result;

/// Pushes text messages to users
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn push_text(&self, user_id: i64, text: &str) -> Result<()>;
}

/// Telegram-backed messenger
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn push_text(&self, user_id: i64, text: &str) -> Result<()> {
        debug!(user_id = user_id, length = text.len(), "Pushing message");
        self.bot.send_message(ChatId(user_id), text.to_string()).await?;
        Ok(())
    }
}
