//! ScenarioBot Telegram Bot
//!
//! Main application entry point

use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::update_listeners::webhooks;
use tracing::{info, warn};

use ScenarioBot::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::{create_pool, run_migrations}},
    services::ServiceFactory,
    state::{ProgressStore, ScenarioManager, StateStorage},
    handlers::{Command, handle_command, handle_message},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on shutdown
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ScenarioBot::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    // Initialize Redis connection
    info!("Connecting to Redis...");
    let state_storage = StateStorage::new(settings.redis.clone()).await?;
    state_storage.health_check().await?;

    let database_service = DatabaseService::new(db_pool);

    // Initialize scenarios
    let scenario_manager = ScenarioManager::new();
    if let Some(path) = &settings.engine.scenarios_path {
        info!(path = %path, "Importing scenarios from file");
        for scenario in ScenarioManager::load_from_file(path).await? {
            database_service.save_scenario(&scenario_manager, scenario).await?;
        }
    }
    database_service
        .restore_scenarios(&scenario_manager, settings.engine.default_scenario.as_deref())
        .await?;

    let bot = Bot::new(&settings.bot.token);

    info!("Initializing services...");
    let progress_store: Arc<dyn ProgressStore> = Arc::new(state_storage);
    let services = ServiceFactory::new(
        bot.clone(),
        settings.clone(),
        database_service,
        scenario_manager,
        progress_store,
    )?;

    let mut dispatcher = Dispatcher::builder(bot.clone(), create_handler())
        .dependencies(dptree::deps![Arc::new(services)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("ScenarioBot is ready!");

    match &settings.bot.webhook_url {
        Some(webhook_url) => {
            let address: SocketAddr = settings.bot.webhook_listen_addr.parse()
                .context("invalid webhook listen address")?;
            let url = webhook_url.parse().context("invalid webhook url")?;

            let mut options = webhooks::Options::new(address, url);
            if let Some(secret) = &settings.bot.webhook_secret {
                options = options.secret_token(secret.clone());
            }

            info!(url = %webhook_url, address = %address, "Starting bot in webhook mode...");
            let listener = webhooks::axum(bot, options).await?;
            dispatcher
                .dispatch_with_listener(listener, LoggingErrorHandler::with_custom_text("Error from the webhook listener"))
                .await;
        }
        None => {
            info!("Starting bot with polling mode...");
            dispatcher.dispatch().await;
        }
    }

    info!("ScenarioBot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .branch(
            // Handle commands
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_commands)
        )
        .branch(
            // Everything else goes to the scenario engine
            dptree::endpoint(handle_messages)
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = handle_command(bot, msg, cmd, services).await {
        logging::log_handler_error("command", &e);
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = handle_message(bot, msg, services).await {
        logging::log_handler_error("message", &e);
        return Err(e.into());
    }

    Ok(())
}
