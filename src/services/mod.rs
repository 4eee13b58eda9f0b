//! Services module
//!
//! This module contains the collaborators the scenario engine talks to and
//! the business services used by the bot handlers

pub mod http;
pub mod message_log;
pub mod messenger;
pub mod user;

// Re-export commonly used services
pub use http::{ApiResponse, HttpClient, ReqwestHttpClient};
pub use message_log::{MemoryMessageLog, MessageLog};
pub use messenger::{Messenger, TelegramMessenger};
pub use user::UserService;

use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::state::{ProgressStore, ScenarioEngine, ScenarioManager};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub settings: Settings,
    pub database: DatabaseService,
    pub user_service: UserService,
    pub messenger: Arc<dyn Messenger>,
    pub engine: ScenarioEngine,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        bot: Bot,
        settings: Settings,
        database: DatabaseService,
        scenario_manager: ScenarioManager,
        progress_store: Arc<dyn ProgressStore>,
    ) -> Result<Self> {
        let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot));
        let http_client = ReqwestHttpClient::new(Duration::from_secs(settings.engine.api_timeout_seconds))?;
        let user_service = UserService::new(database.users.clone());

        let engine = ScenarioEngine::new(
            scenario_manager,
            progress_store,
            messenger.clone(),
            Arc::new(database.messages.clone()),
            Arc::new(http_client),
            settings.bot.operator_id,
        );

        Ok(Self {
            settings,
            database,
            user_service,
            messenger,
            engine,
        })
    }

    pub fn scenarios(&self) -> &ScenarioManager {
        self.engine.scenarios()
    }
}
