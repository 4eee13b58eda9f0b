//! Conversation log sink
//!
//! Every inbound and outbound message is appended here so operators can
//! review a conversation. The Postgres implementation lives on
//! [`MessageRepository`](crate::database::MessageRepository).

use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use crate::models::{MessageLogEntry, NewLogEntry};
use crate::utils::errors::Result;

/// Append-only message log
#[async_trait]
pub trait MessageLog: Send + Sync {
    async fn append(&self, entry: NewLogEntry) -> Result<()>;

    /// Most recent entries for a user, oldest first
    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<MessageLogEntry>>;
}

/// In-memory message log
#[derive(Debug, Clone, Default)]
pub struct MemoryMessageLog {
    entries: Arc<Mutex<Vec<MessageLogEntry>>>,
}

impl MemoryMessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in append order
    pub async fn entries(&self) -> Vec<MessageLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl MessageLog for MemoryMessageLog {
    async fn append(&self, entry: NewLogEntry) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let id = entries.len() as i64 + 1;
        entries.push(MessageLogEntry {
            id,
            user_id: entry.user_id,
            text: entry.text,
            kind: entry.kind.as_str().to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<MessageLogEntry>> {
        let entries = self.entries.lock().await;
        let mine: Vec<MessageLogEntry> = entries.iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect();
        let skip = mine.len().saturating_sub(limit.max(0) as usize);
        Ok(mine.into_iter().skip(skip).collect())
    }
}
