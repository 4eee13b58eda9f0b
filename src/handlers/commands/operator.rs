//! Operator command handlers
//!
//! Scenario selection and editing, progress inspection and manual messages.
//! Callers check operator rights before dispatching here.

use teloxide::{Bot, types::Message, prelude::*};
use tracing::{info, warn};
use crate::models::{LogKind, MessageLogEntry, NewLogEntry, Scenario, Step, User, UserProgress};
use crate::services::{MessageLog, ServiceFactory};
use crate::utils::errors::{BotError, Result};
use crate::utils::{helpers, logging};

const HISTORY_LIMIT: i64 = 20;
const USER_LIST_LIMIT: i64 = 50;

/// Handle /scenarios command
pub async fn handle_scenarios(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let manager = services.scenarios();
    let current = manager.current_name().await;

    let mut entries = Vec::new();
    for name in manager.scenario_names().await {
        let steps = manager.get_scenario(&name).await.map(|s| s.len()).unwrap_or(0);
        entries.push((name, steps));
    }

    reply(&bot, &msg, format_scenario_list(&entries, current.as_deref())).await
}

/// Handle /use command
pub async fn handle_use(bot: Bot, msg: Message, services: ServiceFactory, operator_id: i64, args: String) -> Result<()> {
    let name = args.trim();
    if name.is_empty() {
        return reply(&bot, &msg, "Usage: /use <name>".to_string()).await;
    }

    match services.database.switch_scenario(services.scenarios(), name, operator_id).await {
        Ok(()) => {
            logging::log_admin_action(operator_id, "switch_scenario", Some(name), None);
            reply(&bot, &msg, format!("✅ Current scenario is now \"{}\"", name)).await
        }
        Err(BotError::ScenarioNotFound { name }) => {
            reply(&bot, &msg, format!("❌ Unknown scenario \"{}\"", name)).await
        }
        Err(e) => Err(e),
    }
}

/// Handle /define command
pub async fn handle_define(bot: Bot, msg: Message, services: ServiceFactory, operator_id: i64, args: String) -> Result<()> {
    let scenario = match parse_define_args(&args) {
        Ok(scenario) => scenario,
        Err(e) => return reply(&bot, &msg, format!("❌ {}", e)).await,
    };

    let name = scenario.name.clone();
    let step_count = scenario.len();
    let unknown = scenario.steps.iter().filter(|step| matches!(step, Step::Unknown { .. })).count();

    match services.database.save_scenario(services.scenarios(), scenario).await {
        Ok(()) => {
            logging::log_admin_action(operator_id, "define_scenario", Some(&name), Some(&format!("{} steps", step_count)));
            let mut text = format!("✅ Scenario \"{}\" saved with {} steps", name, step_count);
            if unknown > 0 {
                text.push_str(&format!("\n⚠️ {} step(s) have an unrecognized type and will be skipped", unknown));
            }
            reply(&bot, &msg, text).await
        }
        Err(BotError::InvalidScenario(reason)) => reply(&bot, &msg, format!("❌ {}", reason)).await,
        Err(e) => Err(e),
    }
}

/// Handle /progress command
pub async fn handle_progress(bot: Bot, msg: Message, services: ServiceFactory, args: String) -> Result<()> {
    let Some(user_id) = helpers::parse_user_id(&args) else {
        return reply(&bot, &msg, "Usage: /progress <user_id>".to_string()).await;
    };

    let text = match services.engine.progress_of(user_id).await? {
        Some(progress) => {
            let step_count = services.scenarios().get_scenario(&progress.scenario_name).await.map(|s| s.len());
            format_progress(&progress, step_count)
        }
        None => format!("User {} has no progress yet", user_id),
    };

    reply(&bot, &msg, text).await
}

/// Handle /reset command
pub async fn handle_reset(bot: Bot, msg: Message, services: ServiceFactory, operator_id: i64, args: String) -> Result<()> {
    let Some(user_id) = helpers::parse_user_id(&args) else {
        return reply(&bot, &msg, "Usage: /reset <user_id>".to_string()).await;
    };

    services.engine.reset_user(user_id).await?;
    logging::log_admin_action(operator_id, "reset_progress", Some(&user_id.to_string()), None);
    reply(&bot, &msg, format!("✅ Progress of user {} reset", user_id)).await
}

/// Handle /say command
pub async fn handle_say(bot: Bot, msg: Message, services: ServiceFactory, operator_id: i64, args: String) -> Result<()> {
    let Some((target, text)) = helpers::split_first_word(&args) else {
        return reply(&bot, &msg, "Usage: /say <user_id> <text>".to_string()).await;
    };
    let (Some(user_id), false) = (helpers::parse_user_id(target), text.is_empty()) else {
        return reply(&bot, &msg, "Usage: /say <user_id> <text>".to_string()).await;
    };

    if let Err(e) = services.messenger.push_text(user_id, text).await {
        warn!(user_id = user_id, error = %e, "Operator message not delivered");
        return reply(&bot, &msg, format!("❌ Message not delivered: {}", e)).await;
    }

    if let Err(e) = services.database.messages.append(NewLogEntry::new(user_id, text, LogKind::Outgoing)).await {
        warn!(user_id = user_id, error = %e, "Failed to log operator message");
    }

    info!(operator_id = operator_id, user_id = user_id, "Operator message sent");
    reply(&bot, &msg, format!("✅ Sent to {}", user_id)).await
}

/// Handle /users command
pub async fn handle_users(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let total = services.user_service.count_users().await?;
    let users = services.user_service.list_users(USER_LIST_LIMIT).await?;
    reply(&bot, &msg, format_user_list(&users, total)).await
}

/// Handle /history command
pub async fn handle_history(bot: Bot, msg: Message, services: ServiceFactory, args: String) -> Result<()> {
    let Some(user_id) = helpers::parse_user_id(&args) else {
        return reply(&bot, &msg, "Usage: /history <user_id>".to_string()).await;
    };

    let entries = services.database.messages.recent_for_user(user_id, HISTORY_LIMIT).await?;
    reply(&bot, &msg, format_history(user_id, &entries)).await
}

async fn reply(bot: &Bot, msg: &Message, text: String) -> Result<()> {
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Parse `<name> <json steps>` into a scenario
pub fn parse_define_args(args: &str) -> std::result::Result<Scenario, String> {
    let (name, raw_steps) = helpers::split_first_word(args)
        .ok_or_else(|| "Usage: /define <name> <json steps>".to_string())?;

    if raw_steps.is_empty() {
        return Err("Usage: /define <name> <json steps>".to_string());
    }

    let steps: Vec<Step> = serde_json::from_str(raw_steps)
        .map_err(|e| format!("Steps must be a JSON array: {}", e))?;

    Ok(Scenario::new(name, steps))
}

pub fn format_scenario_list(entries: &[(String, usize)], current: Option<&str>) -> String {
    if entries.is_empty() {
        return "No scenarios defined. Use /define to create one.".to_string();
    }

    let mut text = String::from("📋 Scenarios:\n");
    for (name, steps) in entries {
        let marker = if Some(name.as_str()) == current { "▶" } else { "•" };
        text.push_str(&format!("{} {} ({} steps)\n", marker, name, steps));
    }
    if current.is_none() {
        text.push_str("\nNo current scenario. Use /use <name> to pick one.");
    }
    text
}

pub fn format_progress(progress: &UserProgress, step_count: Option<usize>) -> String {
    let total = step_count.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string());
    let mut text = format!(
        "👤 User {}\nScenario: {}\nStep: {}/{}\nUpdated: {}",
        progress.user_id,
        progress.scenario_name,
        progress.step,
        total,
        helpers::format_timestamp(progress.updated_at),
    );

    if progress.variables.is_empty() {
        text.push_str("\nVariables: none");
    } else {
        text.push_str("\nVariables:\n");
        text.push_str(&progress.variables_summary());
    }
    text
}

pub fn format_user_list(users: &[User], total: i64) -> String {
    if users.is_empty() {
        return "No users yet".to_string();
    }

    let mut text = format!("👥 Users ({} total):\n", total);
    for user in users {
        match &user.username {
            Some(username) => text.push_str(&format!("{} - {} (@{})\n", user.telegram_id, user.display_name, username)),
            None => text.push_str(&format!("{} - {}\n", user.telegram_id, user.display_name)),
        }
    }
    text
}

pub fn format_history(user_id: i64, entries: &[MessageLogEntry]) -> String {
    if entries.is_empty() {
        return format!("No messages for user {}", user_id);
    }

    let mut text = format!("💬 Recent messages for {}:\n", user_id);
    for entry in entries {
        text.push_str(&format!(
            "[{}] {}: {}\n",
            entry.created_at.format("%m-%d %H:%M"),
            entry.kind,
            helpers::truncate_text(&entry.text, 200),
        ));
    }
    text
}
