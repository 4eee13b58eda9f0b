//! Per-user scenario progress

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::scenario::Step;

/// Variables captured from user replies
pub type Variables = HashMap<String, String>;

/// A user's position and collected answers within the current scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: i64,
    pub scenario_name: String,
    /// Index of the next step to run; equal to the step count once completed
    pub step: usize,
    #[serde(default)]
    pub variables: Variables,
    pub updated_at: DateTime<Utc>,
}

/// Where a user stands relative to a scenario's steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Idle,
    InProgress,
    AwaitingInput,
    Completed,
}

impl UserProgress {
    /// Fresh progress at the start of a scenario
    pub fn new(user_id: i64, scenario_name: impl Into<String>) -> Self {
        Self {
            user_id,
            scenario_name: scenario_name.into(),
            step: 0,
            variables: Variables::new(),
            updated_at: Utc::now(),
        }
    }

    /// Move the cursor past the current step
    pub fn advance(&mut self) {
        self.step += 1;
        self.updated_at = Utc::now();
    }

    /// Store a captured reply; keys are never removed during a run
    pub fn capture(&mut self, key: &str, value: &str) {
        self.variables.insert(key.to_string(), value.to_string());
        self.updated_at = Utc::now();
    }

    /// Back to the first step with no variables
    pub fn reset(&mut self) {
        self.step = 0;
        self.variables.clear();
        self.updated_at = Utc::now();
    }

    /// Point the progress at another scenario, starting over
    pub fn rebind(&mut self, scenario_name: &str) {
        self.scenario_name = scenario_name.to_string();
        self.reset();
    }

    /// Whether this record can be resumed against the given scenario
    pub fn is_bound_to(&self, scenario_name: &str, step_count: usize) -> bool {
        self.scenario_name == scenario_name && self.step <= step_count
    }

    pub fn phase(&self, steps: &[Step]) -> ProgressPhase {
        match steps.get(self.step) {
            None => ProgressPhase::Completed,
            Some(step) if step.awaits_input() => ProgressPhase::AwaitingInput,
            Some(_) if self.step == 0 => ProgressPhase::Idle,
            Some(_) => ProgressPhase::InProgress,
        }
    }

    /// Variables as `key: value` lines, sorted by key
    pub fn variables_summary(&self) -> String {
        let mut keys: Vec<&String> = self.variables.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| format!("{}: {}", key, self.variables[key]))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<Step> {
        vec![
            Step::message("Hi"),
            Step::input_text("Your name?", "name"),
            Step::message("Hello {{name}}"),
        ]
    }

    #[test]
    fn test_phase_follows_cursor() {
        let mut progress = UserProgress::new(1, "welcome");
        assert_eq!(progress.phase(&steps()), ProgressPhase::Idle);
        progress.advance();
        assert_eq!(progress.phase(&steps()), ProgressPhase::AwaitingInput);
        progress.advance();
        assert_eq!(progress.phase(&steps()), ProgressPhase::InProgress);
        progress.advance();
        assert_eq!(progress.phase(&steps()), ProgressPhase::Completed);
    }

    #[test]
    fn test_reset_clears_variables() {
        let mut progress = UserProgress::new(1, "welcome");
        progress.capture("name", "Alice");
        progress.advance();
        progress.reset();
        assert_eq!(progress.step, 0);
        assert!(progress.variables.is_empty());
        assert_eq!(progress.scenario_name, "welcome");
    }

    #[test]
    fn test_binding_checks_name_and_range() {
        let mut progress = UserProgress::new(1, "welcome");
        progress.step = 3;
        assert!(progress.is_bound_to("welcome", 3));
        assert!(!progress.is_bound_to("welcome", 2));
        assert!(!progress.is_bound_to("survey", 3));

        progress.rebind("survey");
        assert_eq!(progress.scenario_name, "survey");
        assert_eq!(progress.step, 0);
    }

    #[test]
    fn test_variables_summary_is_sorted() {
        let mut progress = UserProgress::new(1, "welcome");
        progress.capture("zip", "100-0001");
        progress.capture("city", "Tokyo");
        assert_eq!(progress.variables_summary(), "city: Tokyo\nzip: 100-0001");
    }
}
