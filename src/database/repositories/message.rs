//! Message log repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::models::message::{MessageLogEntry, NewLogEntry};
use crate::services::MessageLog;
use crate::utils::errors::BotError;

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a log entry
    pub async fn create(&self, entry: NewLogEntry) -> Result<MessageLogEntry, BotError> {
        let row = sqlx::query_as::<_, MessageLogEntry>(
            r#"
            INSERT INTO message_logs (user_id, text, kind, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, text, kind, created_at
            "#
        )
        .bind(entry.user_id)
        .bind(entry.text)
        .bind(entry.kind.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Latest entries for a user, oldest first
    pub async fn find_recent_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<MessageLogEntry>, BotError> {
        let mut rows = sqlx::query_as::<_, MessageLogEntry>(
            "SELECT id, user_id, text, kind, created_at FROM message_logs WHERE user_id = $1 ORDER BY id DESC LIMIT $2"
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.reverse();
        Ok(rows)
    }
}

#[async_trait]
impl MessageLog for MessageRepository {
    async fn append(&self, entry: NewLogEntry) -> Result<(), BotError> {
        self.create(entry).await.map(|_| ())
    }

    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<MessageLogEntry>, BotError> {
        self.find_recent_by_user(user_id, limit).await
    }
}
