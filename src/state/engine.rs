//! Scenario execution engine
//!
//! One call to [`ScenarioEngine::on_inbound_text`] handles one message from a
//! user in three phases:
//!
//! 1. If the cursor sits on an `input_text` step, the message becomes the
//!    answer and the cursor moves on. Any other message leaves the cursor
//!    where it is.
//! 2. Steps run forward until one waits for input or the scenario ends.
//!    Progress is saved after every advance, so a restart never repeats a
//!    step that already ran.
//! 3. When the scenario ends the operator is notified and the user's progress
//!    goes back to the first step with no variables.
//!
//! Deciding what a step does ([`plan_step`], [`resolve_pending_input`]) is
//! kept apart from doing it, which goes through the collaborator traits.

use std::sync::Arc;
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;
use crate::models::{HttpMethod, LogKind, NewLogEntry, Scenario, Step, UserProgress, Variables};
use crate::services::{HttpClient, MessageLog, Messenger};
use crate::utils::errors::Result;
use crate::utils::{helpers, logging};
use super::locks::UserLocks;
use super::scenarios::ScenarioManager;
use super::storage::ProgressStore;
use super::template::{substitute_text, substitute_value};

/// What running a step amounts to, after substitution
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Send text and move on
    Send(String),
    /// Send text and wait for the user's reply
    Prompt(String),
    /// Call an external endpoint and move on whatever the result
    CallApi { method: HttpMethod, url: String, body: Option<Value> },
    /// Nothing to do; move on
    Skip { kind: String },
}

impl StepAction {
    pub fn suspends(&self) -> bool {
        matches!(self, StepAction::Prompt(_))
    }
}

/// Decide what a step does given the collected variables
pub fn plan_step(step: &Step, variables: &Variables) -> StepAction {
    match step {
        Step::Message { content } => StepAction::Send(substitute_text(content, variables)),
        Step::InputText { prompt, .. } => StepAction::Prompt(substitute_text(prompt, variables)),
        Step::ApiCall { url, method, body } => StepAction::CallApi {
            method: *method,
            url: substitute_text(url, variables),
            body: body.as_ref().map(|body| substitute_value(body, variables)),
        },
        Step::Unknown { kind } => StepAction::Skip { kind: kind.clone() },
    }
}

/// How an inbound message related to the step under the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResolution {
    /// The cursor was not on an input step; the text was ignored
    NotAwaiting,
    /// The text was stored under `key` and the cursor advanced
    Captured { key: String },
    /// The input step has no variable name; the cursor advanced anyway
    Discarded,
}

/// Apply an inbound message to the step under the cursor
pub fn resolve_pending_input(progress: &mut UserProgress, steps: &[Step], text: &str) -> InputResolution {
    match steps.get(progress.step) {
        Some(Step::InputText { save_as: Some(key), .. }) => {
            progress.capture(key, text);
            progress.advance();
            InputResolution::Captured { key: key.clone() }
        }
        Some(Step::InputText { save_as: None, .. }) => {
            progress.advance();
            InputResolution::Discarded
        }
        _ => InputResolution::NotAwaiting,
    }
}

/// Result of handling one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// No current scenario, or it has no steps
    NoScenario,
    /// Waiting for the user's reply to the step at `step`
    AwaitingInput { step: usize },
    /// The scenario finished and progress was reset
    Completed,
}

/// Drives users through the current scenario
#[derive(Clone)]
pub struct ScenarioEngine {
    scenarios: ScenarioManager,
    store: Arc<dyn ProgressStore>,
    messenger: Arc<dyn Messenger>,
    message_log: Arc<dyn MessageLog>,
    http: Arc<dyn HttpClient>,
    operator_id: i64,
    locks: UserLocks,
}

impl ScenarioEngine {
    pub fn new(
        scenarios: ScenarioManager,
        store: Arc<dyn ProgressStore>,
        messenger: Arc<dyn Messenger>,
        message_log: Arc<dyn MessageLog>,
        http: Arc<dyn HttpClient>,
        operator_id: i64,
    ) -> Self {
        Self {
            scenarios,
            store,
            messenger,
            message_log,
            http,
            operator_id,
            locks: UserLocks::new(),
        }
    }

    pub fn scenarios(&self) -> &ScenarioManager {
        &self.scenarios
    }

    /// Handle one text message from a user.
    ///
    /// Only storage failures are returned as errors; delivery, logging and API
    /// failures are logged and the run carries on.
    pub async fn on_inbound_text(&self, user_id: i64, text: &str) -> Result<HandleOutcome> {
        let span = info_span!("scenario_run", user_id = user_id, run_id = %Uuid::new_v4());

        async {
            let _guard = self.locks.acquire(user_id).await;
            self.append_log(user_id, text, LogKind::Incoming).await;
            self.handle(user_id, text).await
        }
        .instrument(span)
        .await
    }

    /// Current progress of a user, if any
    pub async fn progress_of(&self, user_id: i64) -> Result<Option<UserProgress>> {
        let _guard = self.locks.acquire(user_id).await;
        self.store.load_progress(user_id).await
    }

    /// Drop a user's progress so their next message starts over
    pub async fn reset_user(&self, user_id: i64) -> Result<()> {
        let _guard = self.locks.acquire(user_id).await;
        self.store.reset_progress(user_id).await?;
        info!(user_id = user_id, "User progress reset");
        Ok(())
    }

    /// Phases 1-3 for a user whose lock is held
    async fn handle(&self, user_id: i64, text: &str) -> Result<HandleOutcome> {
        let Some(scenario) = self.scenarios.current().await else {
            logging::log_configuration_gap(user_id, None, "no current scenario");
            return Ok(HandleOutcome::NoScenario);
        };

        if scenario.is_empty() {
            logging::log_configuration_gap(user_id, Some(scenario.name.as_str()), "current scenario has no steps");
            return Ok(HandleOutcome::NoScenario);
        }

        let mut progress = self.load_bound_progress(user_id, &scenario).await?;

        match resolve_pending_input(&mut progress, &scenario.steps, text) {
            InputResolution::Captured { key } => {
                debug!(user_id = user_id, variable = %key, "Captured user input");
                self.store.save_progress(&progress).await?;
            }
            InputResolution::Discarded => {
                logging::log_configuration_gap(user_id, Some(scenario.name.as_str()), "input step has no save_as; reply discarded");
                self.store.save_progress(&progress).await?;
            }
            InputResolution::NotAwaiting => {}
        }

        while progress.step < scenario.len() {
            let index = progress.step;
            let step = &scenario.steps[index];
            let action = plan_step(step, &progress.variables);
            logging::log_step_executed(user_id, &scenario.name, index, step.kind());

            let suspends = action.suspends();
            self.perform(user_id, action).await;

            if suspends {
                self.store.save_progress(&progress).await?;
                return Ok(HandleOutcome::AwaitingInput { step: index });
            }

            progress.advance();
            self.store.save_progress(&progress).await?;
        }

        self.complete(&scenario, &mut progress).await?;
        Ok(HandleOutcome::Completed)
    }

    /// Load progress for the scenario, starting over when the record belongs
    /// to another scenario or points past its end
    async fn load_bound_progress(&self, user_id: i64, scenario: &Scenario) -> Result<UserProgress> {
        match self.store.load_progress(user_id).await? {
            Some(progress) if progress.is_bound_to(&scenario.name, scenario.len()) => Ok(progress),
            Some(mut progress) => {
                info!(user_id = user_id, from = %progress.scenario_name, to = %scenario.name,
                      step = progress.step, "Rebinding progress to current scenario");
                progress.rebind(&scenario.name);
                self.store.save_progress(&progress).await?;
                Ok(progress)
            }
            None => {
                logging::log_user_action(user_id, "scenario_started", Some(scenario.name.as_str()));
                let progress = UserProgress::new(user_id, &scenario.name);
                self.store.save_progress(&progress).await?;
                Ok(progress)
            }
        }
    }

    async fn perform(&self, user_id: i64, action: StepAction) {
        match action {
            StepAction::Send(text) | StepAction::Prompt(text) => {
                if !text.is_empty() {
                    self.push(user_id, &text).await;
                    self.append_log(user_id, &text, LogKind::Auto).await;
                }
            }
            StepAction::CallApi { method, url, body } => {
                match self.http.request(method, &url, body.as_ref()).await {
                    Ok(response) if response.is_success() => {
                        debug!(user_id = user_id, method = %method, url = %url, status = response.status, "API call succeeded");
                    }
                    Ok(response) => {
                        let context = format!("{} {} returned {}: {}", method, url, response.status,
                                              helpers::truncate_text(&response.body, 200));
                        logging::log_integration_failure("api_call", "non-success status", Some(&context));
                    }
                    Err(e) => {
                        let context = format!("{} {}", method, url);
                        logging::log_integration_failure("api_call", &e.to_string(), Some(&context));
                    }
                }
            }
            StepAction::Skip { kind } => {
                warn!(user_id = user_id, kind = %kind, "Skipping unrecognized step");
            }
        }
    }

    /// Notify the operator and reset progress for the next run
    async fn complete(&self, scenario: &Scenario, progress: &mut UserProgress) -> Result<()> {
        let user_id = progress.user_id;
        let notice = completion_notice(&scenario.name, progress);

        if let Err(e) = self.messenger.push_text(self.operator_id, &notice).await {
            error!(user_id = user_id, operator_id = self.operator_id, error = %e, "Failed to notify operator");
        }
        self.append_log(user_id, &notice, LogKind::Notify).await;

        progress.reset();
        self.store.save_progress(progress).await?;
        logging::log_user_action(user_id, "scenario_completed", Some(scenario.name.as_str()));
        Ok(())
    }

    async fn push(&self, user_id: i64, text: &str) {
        if let Err(e) = self.messenger.push_text(user_id, text).await {
            let context = format!("user {}", user_id);
            logging::log_integration_failure("push_message", &e.to_string(), Some(&context));
        }
    }

    async fn append_log(&self, user_id: i64, text: &str, kind: LogKind) {
        if let Err(e) = self.message_log.append(NewLogEntry::new(user_id, text, kind)).await {
            error!(user_id = user_id, kind = %kind, error = %e, "Failed to append message log");
        }
    }
}

/// Text sent to the operator when a user finishes a scenario
pub fn completion_notice(scenario_name: &str, progress: &UserProgress) -> String {
    let mut notice = format!("Scenario \"{}\" completed by user {}", scenario_name, progress.user_id);
    if !progress.variables.is_empty() {
        notice.push('\n');
        notice.push_str(&progress.variables_summary());
    }
    notice
}
