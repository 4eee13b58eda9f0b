//! Scenario catalog and the current-scenario pointer
//!
//! The manager keeps every known scenario definition plus a single pointer to
//! the scenario new conversations run. Both are swapped as whole `Arc`s, so a
//! reader always sees either the old or the new definition, never a mix.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn, debug};
use crate::models::Scenario;
use crate::utils::errors::{BotError, Result};

/// Scenario manager holding definitions and the current selection
#[derive(Debug, Clone, Default)]
pub struct ScenarioManager {
    scenarios: Arc<RwLock<HashMap<String, Arc<Scenario>>>>,
    current: Arc<RwLock<Option<Arc<Scenario>>>>,
}

impl ScenarioManager {
    /// Create an empty scenario manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the given scenarios registered
    pub async fn with_scenarios(scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        let manager = Self::new();
        for scenario in scenarios {
            manager.register_scenario(scenario).await;
        }
        manager
    }

    /// Register a scenario, replacing any definition with the same name.
    ///
    /// When the replaced scenario is the current one, the pointer moves to the
    /// new definition as well.
    pub async fn register_scenario(&self, scenario: Scenario) -> Arc<Scenario> {
        let scenario = Arc::new(scenario);
        let name = scenario.name.clone();

        // Lock order is catalog, then current, in every method touching both
        let mut scenarios = self.scenarios.write().await;
        scenarios.insert(name.clone(), scenario.clone());

        let mut current = self.current.write().await;
        if current.as_ref().is_some_and(|active| active.name == name) {
            info!(scenario = %name, "Current scenario definition replaced");
            *current = Some(scenario.clone());
        }

        debug!(scenario = %name, steps = scenario.len(), "Scenario registered");
        scenario
    }

    /// Get a scenario by name
    pub async fn get_scenario(&self, name: &str) -> Option<Arc<Scenario>> {
        self.scenarios.read().await.get(name).cloned()
    }

    /// Names of all registered scenarios, sorted
    pub async fn scenario_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scenarios.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Make a registered scenario the current one
    pub async fn activate(&self, name: &str) -> Result<Arc<Scenario>> {
        let scenarios = self.scenarios.read().await;
        let scenario = scenarios.get(name)
            .cloned()
            .ok_or_else(|| BotError::ScenarioNotFound { name: name.to_string() })?;

        *self.current.write().await = Some(scenario.clone());
        drop(scenarios);
        info!(scenario = %name, steps = scenario.len(), "Current scenario switched");
        Ok(scenario)
    }

    /// Snapshot of the current scenario
    pub async fn current(&self) -> Option<Arc<Scenario>> {
        self.current.read().await.clone()
    }

    pub async fn current_name(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|scenario| scenario.name.clone())
    }

    /// Read scenario definitions from a JSON file holding an array of
    /// `{"name": ..., "steps": [...]}` objects
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<Scenario>> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let scenarios: Vec<Scenario> = serde_json::from_str(&raw)?;

        for scenario in &scenarios {
            validate_scenario(scenario)?;
            let unknown = scenario.steps.iter()
                .filter(|step| matches!(step, crate::models::Step::Unknown { .. }))
                .count();
            if unknown > 0 {
                warn!(scenario = %scenario.name, unknown_steps = unknown, "Scenario contains unrecognized steps");
            }
        }

        info!(path = %path.display(), count = scenarios.len(), "Scenario definitions loaded from file");
        Ok(scenarios)
    }
}

/// Check that a scenario definition can be stored
pub fn validate_scenario(scenario: &Scenario) -> Result<()> {
    let name = scenario.name.trim();
    if name.is_empty() {
        return Err(BotError::InvalidScenario("Scenario name cannot be empty".to_string()));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(BotError::InvalidScenario(format!("Scenario name '{}' cannot contain whitespace", name)));
    }

    Ok(())
}
