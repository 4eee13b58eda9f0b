//! Message log model

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Who produced a logged message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Sent by the user
    Incoming,
    /// Sent manually by an operator
    Outgoing,
    /// Sent by the scenario engine
    Auto,
    /// Completion notice delivered to the operator
    Notify,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Incoming => "incoming",
            LogKind::Outgoing => "outgoing",
            LogKind::Auto => "auto",
            LogKind::Notify => "notify",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(LogKind::Incoming),
            "outgoing" => Ok(LogKind::Outgoing),
            "auto" => Ok(LogKind::Auto),
            "notify" => Ok(LogKind::Notify),
            other => Err(format!("unknown log kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageLogEntry {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl MessageLogEntry {
    pub fn log_kind(&self) -> Option<LogKind> {
        self.kind.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub user_id: i64,
    pub text: String,
    pub kind: LogKind,
}

impl NewLogEntry {
    pub fn new(user_id: i64, text: impl Into<String>, kind: LogKind) -> Self {
        Self { user_id, text: text.into(), kind }
    }
}
