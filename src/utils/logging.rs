//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ScenarioBot application.

use std::path::Path;
use tracing::{info, warn, error, debug, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{BotError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for as long as the process runs.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "scenariobot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| BotError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| BotError::Config(format!("Logging already initialized: {}", e)))?;

    info!(level = %config.level, directory = %Path::new(&config.file_path).display(), "Logging initialized");
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log a scenario step the engine has just executed
pub fn log_step_executed(user_id: i64, scenario: &str, step: usize, kind: &str) {
    debug!(
        user_id = user_id,
        scenario = scenario,
        step = step,
        kind = kind,
        "Scenario step executed"
    );
}

/// Log a scenario configuration gap that was skipped over
pub fn log_configuration_gap(user_id: i64, scenario: Option<&str>, details: &str) {
    warn!(
        user_id = user_id,
        scenario = scenario,
        details = details,
        "Scenario configuration gap"
    );
}

/// Log failures of outbound integrations (message delivery, API calls)
pub fn log_integration_failure(integration: &str, error: &str, context: Option<&str>) {
    error!(
        integration = integration,
        error = error,
        context = context,
        "Integration call failed"
    );
}

/// Log an error a handler returned to the dispatcher.
///
/// Recoverable errors (a later update may succeed) are warnings; the rest are
/// errors. Returns the level used.
pub fn log_handler_error(handler: &str, err: &BotError) -> Level {
    if err.is_recoverable() {
        warn!(handler = handler, error = %err, severity = %err.severity(), "Handler failed; later updates may succeed");
        Level::WARN
    } else {
        error!(handler = handler, error = %err, severity = %err.severity(), "Handler failed");
        Level::ERROR
    }
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_level_follows_recoverability() {
        let storage = BotError::Storage("connection reset".to_string());
        assert_eq!(log_handler_error("message", &storage), Level::WARN);

        let invalid = BotError::InvalidScenario("empty name".to_string());
        assert_eq!(log_handler_error("command", &invalid), Level::ERROR);
    }
}
