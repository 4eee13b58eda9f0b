//! Database service layer
//!
//! This module provides a high-level interface to database operations

use tracing::{info, warn};
use crate::database::{DatabasePool, UserRepository, ScenarioRepository, MessageRepository, SettingsRepository, CURRENT_SCENARIO_KEY};
use crate::models::Scenario;
use crate::state::scenarios::validate_scenario;
use crate::state::ScenarioManager;
use crate::utils::errors::BotError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub scenarios: ScenarioRepository,
    pub messages: MessageRepository,
    pub settings: SettingsRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            scenarios: ScenarioRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool),
        }
    }

    /// Store a scenario definition and make it available to the engine
    pub async fn save_scenario(&self, manager: &ScenarioManager, scenario: Scenario) -> Result<(), BotError> {
        validate_scenario(&scenario)?;
        self.scenarios.upsert(&scenario).await?;
        manager.register_scenario(scenario).await;
        Ok(())
    }

    /// Switch the current scenario and remember the choice across restarts
    pub async fn switch_scenario(&self, manager: &ScenarioManager, name: &str, operator_id: i64) -> Result<(), BotError> {
        manager.activate(name).await?;
        self.settings.set(CURRENT_SCENARIO_KEY, name, Some(operator_id)).await?;
        Ok(())
    }

    /// Register stored scenarios and restore the current selection.
    ///
    /// The stored selection wins over `default_scenario`; a name that is not
    /// registered is logged and ignored.
    pub async fn restore_scenarios(&self, manager: &ScenarioManager, default_scenario: Option<&str>) -> Result<(), BotError> {
        let stored = self.scenarios.list().await?;
        info!(count = stored.len(), "Loaded scenarios from database");
        for scenario in stored {
            manager.register_scenario(scenario).await;
        }

        let selected = match self.settings.get(CURRENT_SCENARIO_KEY).await? {
            Some(name) => Some(name),
            None => default_scenario.map(str::to_string),
        };

        match selected {
            Some(name) => {
                if let Err(e) = manager.activate(&name).await {
                    warn!(scenario = %name, error = %e, "Configured current scenario is not available");
                }
            }
            None => warn!("No current scenario configured; inbound messages will only be logged"),
        }

        Ok(())
    }
}
