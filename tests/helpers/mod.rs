//! Test helpers module
//!
//! Fakes for the engine's collaborators and a harness that wires them to a
//! [`ScenarioEngine`] over in-memory storage.

#![allow(dead_code)]

pub mod telegram_mock;

pub use telegram_mock::*;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use ScenarioBot::models::{HttpMethod, LogKind, Scenario, UserProgress};
use ScenarioBot::services::{ApiResponse, HttpClient, MemoryMessageLog, MessageLog, Messenger};
use ScenarioBot::state::{MemoryStateStorage, ProgressStore, ScenarioEngine, ScenarioManager};
use ScenarioBot::{BotError, Result};

pub const OPERATOR_ID: i64 = 999;

/// Messenger that records every push, optionally failing for some recipients
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<(i64, String)>>>,
    fail_for: HashSet<i64>,
    delay: Option<Duration>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes to `user_id` fail (nothing is recorded for them)
    pub fn failing_for(mut self, user_id: i64) -> Self {
        self.fail_for.insert(user_id);
        self
    }

    /// Every push sleeps first, widening race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, user_id: i64) -> Vec<String> {
        self.sent.lock().await.iter()
            .filter(|(to, _)| *to == user_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn push_text(&self, user_id: i64, text: &str) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_for.contains(&user_id) {
            return Err(BotError::InvalidInput(format!("chat {} unreachable", user_id)));
        }
        self.sent.lock().await.push((user_id, text.to_string()));
        Ok(())
    }
}

/// HTTP client that records requests and answers with a fixed status
#[derive(Clone)]
pub struct StubHttpClient {
    pub requests: Arc<Mutex<Vec<(HttpMethod, String, Option<Value>)>>>,
    status: u16,
}

impl StubHttpClient {
    pub fn with_status(status: u16) -> Self {
        Self { requests: Arc::new(Mutex::new(Vec::new())), status }
    }

    pub async fn requests(&self) -> Vec<(HttpMethod, String, Option<Value>)> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn request(&self, method: HttpMethod, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.requests.lock().await.push((method, url.to_string(), body.cloned()));
        Ok(ApiResponse { status: self.status, body: String::new() })
    }
}

/// Progress store whose writes always fail
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: MemoryStateStorage,
}

#[async_trait]
impl ProgressStore for FailingStore {
    async fn load_progress(&self, user_id: i64) -> Result<Option<UserProgress>> {
        self.inner.load_progress(user_id).await
    }

    async fn save_progress(&self, _progress: &UserProgress) -> Result<()> {
        Err(BotError::Storage("disk full".to_string()))
    }

    async fn reset_progress(&self, _user_id: i64) -> Result<()> {
        Err(BotError::Storage("disk full".to_string()))
    }
}

/// Store that records the step of every save attempt and can fail one of them
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryStateStorage,
    saves: Arc<Mutex<Vec<usize>>>,
    fail_on_save: Option<usize>,
}

impl RecordingStore {
    /// Shares records with `inner`; the `attempt`-th save (1-based) fails
    pub fn failing_on_save(inner: MemoryStateStorage, attempt: usize) -> Self {
        Self { inner, saves: Arc::default(), fail_on_save: Some(attempt) }
    }

    pub fn over(inner: MemoryStateStorage) -> Self {
        Self { inner, saves: Arc::default(), fail_on_save: None }
    }

    /// Step of each attempted save, in order
    pub async fn saved_steps(&self) -> Vec<usize> {
        self.saves.lock().await.clone()
    }
}

#[async_trait]
impl ProgressStore for RecordingStore {
    async fn load_progress(&self, user_id: i64) -> Result<Option<UserProgress>> {
        self.inner.load_progress(user_id).await
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        let mut saves = self.saves.lock().await;
        saves.push(progress.step);
        if Some(saves.len()) == self.fail_on_save {
            return Err(BotError::Storage("write rejected".to_string()));
        }
        self.inner.save_progress(progress).await
    }

    async fn reset_progress(&self, user_id: i64) -> Result<()> {
        self.inner.reset_progress(user_id).await
    }
}

/// Engine over the given store and messenger, with `scenario` current
pub async fn engine_with_store(
    scenario: Scenario,
    store: Arc<dyn ProgressStore>,
    messenger: RecordingMessenger,
) -> ScenarioEngine {
    let name = scenario.name.clone();
    let manager = ScenarioManager::with_scenarios([scenario]).await;
    manager.activate(&name).await.expect("scenario was just registered");

    ScenarioEngine::new(
        manager,
        store,
        Arc::new(messenger),
        Arc::new(MemoryMessageLog::new()),
        Arc::new(StubHttpClient::with_status(200)),
        OPERATOR_ID,
    )
}

/// Engine wired to in-memory collaborators
pub struct EngineHarness {
    pub engine: ScenarioEngine,
    pub messenger: RecordingMessenger,
    pub log: MemoryMessageLog,
    pub store: MemoryStateStorage,
}

impl EngineHarness {
    /// Harness whose current scenario is `scenario`
    pub async fn with_scenario(scenario: Scenario) -> Self {
        Self::build(Some(scenario), RecordingMessenger::new(), Arc::new(StubHttpClient::with_status(200))).await
    }

    pub async fn build(
        scenario: Option<Scenario>,
        messenger: RecordingMessenger,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let manager = ScenarioManager::new();
        if let Some(scenario) = scenario {
            let name = scenario.name.clone();
            manager.register_scenario(scenario).await;
            manager.activate(&name).await.expect("scenario was just registered");
        }

        let store = MemoryStateStorage::new();
        let log = MemoryMessageLog::new();
        let engine = ScenarioEngine::new(
            manager,
            Arc::new(store.clone()),
            Arc::new(messenger.clone()),
            Arc::new(log.clone()),
            http,
            OPERATOR_ID,
        );

        Self { engine, messenger, log, store }
    }

    pub async fn send(&self, user_id: i64, text: &str) -> ScenarioBot::state::HandleOutcome {
        self.engine.on_inbound_text(user_id, text).await.expect("storage is in memory")
    }

    pub async fn progress(&self, user_id: i64) -> Option<UserProgress> {
        self.store.load_progress(user_id).await.expect("storage is in memory")
    }

    /// Logged (kind, text) pairs for a user in append order
    pub async fn log_for(&self, user_id: i64) -> Vec<(LogKind, String)> {
        self.log.recent_for_user(user_id, i64::MAX).await.expect("log is in memory")
            .into_iter()
            .filter_map(|entry| entry.log_kind().map(|kind| (kind, entry.text)))
            .collect()
    }
}
