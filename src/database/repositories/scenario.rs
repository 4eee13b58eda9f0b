//! Scenario definition repository

use sqlx::PgPool;
use chrono::Utc;
use tracing::warn;
use crate::models::scenario::{Scenario, ScenarioRecord};
use crate::utils::errors::BotError;

#[derive(Clone, Debug)]
pub struct ScenarioRepository {
    pool: PgPool,
}

impl ScenarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a scenario or replace its steps wholesale
    pub async fn upsert(&self, scenario: &Scenario) -> Result<ScenarioRecord, BotError> {
        let steps = serde_json::to_value(&scenario.steps)?;

        let record = sqlx::query_as::<_, ScenarioRecord>(
            r#"
            INSERT INTO scenarios (name, steps, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (name)
            DO UPDATE SET
                steps = EXCLUDED.steps,
                updated_at = EXCLUDED.updated_at
            RETURNING name, steps, created_at, updated_at
            "#
        )
        .bind(&scenario.name)
        .bind(steps)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Load every stored scenario, skipping rows whose steps are malformed
    pub async fn list(&self) -> Result<Vec<Scenario>, BotError> {
        let records = sqlx::query_as::<_, ScenarioRecord>(
            "SELECT name, steps, created_at, updated_at FROM scenarios ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        let mut scenarios = Vec::with_capacity(records.len());
        for record in records {
            let name = record.name.clone();
            match record.into_scenario() {
                Ok(scenario) => scenarios.push(scenario),
                Err(e) => warn!(scenario = %name, error = %e, "Skipping malformed scenario"),
            }
        }

        Ok(scenarios)
    }
}
