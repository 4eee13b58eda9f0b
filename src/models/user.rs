//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub display_name: String,
}

impl CreateUserRequest {
    /// Build a request from Telegram profile fields
    pub fn from_profile(telegram_id: i64, username: Option<String>, first_name: &str, last_name: Option<&str>) -> Self {
        let display_name = match last_name {
            Some(last) if !last.is_empty() => format!("{} {}", first_name, last),
            _ => first_name.to_string(),
        };

        Self { telegram_id, username, display_name }
    }
}
