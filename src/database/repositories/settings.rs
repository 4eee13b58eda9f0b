//! Admin settings repository implementation
//!
//! Key/value settings an operator changes at run time, such as the current
//! scenario.

use sqlx::PgPool;
use chrono::Utc;
use crate::utils::errors::BotError;

/// Setting key holding the current scenario name
pub const CURRENT_SCENARIO_KEY: &str = "current_scenario";

#[derive(Clone, Debug)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get admin setting by key
    pub async fn get(&self, key: &str) -> Result<Option<String>, BotError> {
        let value: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM admin_settings WHERE key = $1"
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.map(|(value,)| value))
    }

    /// Create or update admin setting
    pub async fn set(&self, key: &str, value: &str, updated_by: Option<i64>) -> Result<(), BotError> {
        sqlx::query(
            r#"
            INSERT INTO admin_settings (key, value, updated_by, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            "#
        )
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
