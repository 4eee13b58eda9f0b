//! Mock Telegram API Server for testing
//!
//! Answers `sendMessage` the way the Bot API does so [`TelegramMessenger`]
//! can be exercised without network access.
//!
//! [`TelegramMessenger`]: ScenarioBot::services::TelegramMessenger

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "123456789:TEST-token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Bot pointed at this server
    pub fn bot(&self) -> Bot {
        let url = url::Url::parse(&self.server.uri()).expect("mock server uri is valid");
        Bot::new(TEST_BOT_TOKEN).set_api_url(url)
    }

    /// Accept every sendMessage call
    pub async fn mock_send_message(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot.*/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(send_message_ok()))
            .mount(&self.server)
            .await;
    }

    /// Reject every sendMessage call the way Telegram does for blocked users
    pub async fn mock_send_message_forbidden(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot.*/sendmessage$"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of all sendMessage requests received so far
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}

fn send_message_ok() -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 123,
            "from": {
                "id": 123456789,
                "is_bot": true,
                "first_name": "ScenarioBot",
                "username": "scenario_bot"
            },
            "chat": {
                "id": 42,
                "first_name": "Alice",
                "type": "private"
            },
            "date": 1640995200,
            "text": "Test message"
        }
    })
}
