//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub webhook_url: Option<String>,
    #[serde(default = "default_webhook_listen_addr")]
    pub webhook_listen_addr: String,
    pub webhook_secret: Option<String>,
    pub admin_ids: Vec<i64>,
    /// Destination for scenario completion notices
    pub operator_id: i64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    /// Progress record expiry; 0 keeps records forever
    #[serde(default)]
    pub ttl_seconds: u64,
}

/// Scenario engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Scenario made current when none was chosen by an operator yet
    pub default_scenario: Option<String>,
    /// JSON file with scenario definitions loaded on startup
    pub scenarios_path: Option<String>,
    #[serde(default = "default_api_timeout_seconds")]
    pub api_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

fn default_webhook_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_api_timeout_seconds() -> u64 {
    10
}

fn default_acquire_timeout_seconds() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_scenario: None,
            scenarios_path: None,
            api_timeout_seconds: default_api_timeout_seconds(),
        }
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SCENARIOBOT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::BotError> {
        super::validation::validate_settings(self)
    }

    /// Whether the user may run operator commands
    pub fn is_operator(&self, user_id: i64) -> bool {
        user_id == self.bot.operator_id || self.bot.admin_ids.contains(&user_id)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                webhook_url: None,
                webhook_listen_addr: default_webhook_listen_addr(),
                webhook_secret: None,
                admin_ids: vec![],
                operator_id: 0,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/scenariobot".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: default_acquire_timeout_seconds(),
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "scenariobot:".to_string(),
                ttl_seconds: 0,
            },
            engine: EngineConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
