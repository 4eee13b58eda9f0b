//! Scenario and step models
//!
//! Steps arrive loosely typed (a bare string or a JSON record with a `type`
//! tag) and are normalized exactly once, when deserialized, into the closed
//! [`Step`] enum.

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::FromRow;

/// A named, ordered sequence of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self { name: name.into(), steps }
    }

    /// Number of steps; a cursor equal to this value means "completed"
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// HTTP methods an `api_call` step may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Parse a method name, case-insensitively
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of scenario behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Step {
    /// Send `content` to the user
    Message { content: String },
    /// Send `prompt` and wait for the user's reply
    InputText { prompt: String, save_as: Option<String> },
    /// Call an external HTTP endpoint; the response is not used
    ApiCall { url: String, method: HttpMethod, body: Option<Value> },
    /// Unrecognized step, skipped at run time
    Unknown { kind: String },
}

impl Step {
    pub fn message(content: impl Into<String>) -> Self {
        Step::Message { content: content.into() }
    }

    pub fn input_text(prompt: impl Into<String>, save_as: impl Into<String>) -> Self {
        Step::InputText { prompt: prompt.into(), save_as: Some(save_as.into()) }
    }

    pub fn api_call(url: impl Into<String>, method: HttpMethod, body: Option<Value>) -> Self {
        Step::ApiCall { url: url.into(), method, body }
    }

    /// Short name of the step kind, as used in logs and the wire format
    pub fn kind(&self) -> &str {
        match self {
            Step::Message { .. } => "message",
            Step::InputText { .. } => "input_text",
            Step::ApiCall { .. } => "api_call",
            Step::Unknown { kind } => kind,
        }
    }

    /// Whether the step suspends the run until the user replies
    pub fn awaits_input(&self) -> bool {
        matches!(self, Step::InputText { .. })
    }

    /// Normalize a loosely typed step definition
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(content) => Step::message(content.clone()),
            Value::Object(record) => Self::from_record(record),
            other => Step::Unknown { kind: json_type_name(other).to_string() },
        }
    }

    fn from_record(record: &Map<String, Value>) -> Self {
        let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);

        let Some(kind) = text("type") else {
            return Step::Unknown { kind: "untyped".to_string() };
        };

        match kind.as_str() {
            "message" => Step::Message {
                content: text("content").unwrap_or_default(),
            },
            "input_text" => Step::InputText {
                prompt: text("prompt").unwrap_or_default(),
                save_as: text("save_as")
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty()),
            },
            "api_call" => {
                let Some(url) = text("url") else {
                    return Step::Unknown { kind: "api_call:missing_url".to_string() };
                };
                let method = match text("method") {
                    None => HttpMethod::Get,
                    Some(raw) => match HttpMethod::parse(&raw) {
                        Some(method) => method,
                        None => return Step::Unknown { kind: format!("api_call:{}", raw) },
                    },
                };
                let body = record.get("body").filter(|body| !body.is_null()).cloned();
                Step::ApiCall { url, method, body }
            }
            _ => Step::Unknown { kind },
        }
    }

    /// Wire representation of the step
    pub fn to_value(&self) -> Value {
        match self {
            Step::Message { content } => json!({ "type": "message", "content": content }),
            Step::InputText { prompt, save_as } => {
                json!({ "type": "input_text", "prompt": prompt, "save_as": save_as })
            }
            Step::ApiCall { url, method, body } => {
                json!({ "type": "api_call", "url": url, "method": method.as_str(), "body": body })
            }
            Step::Unknown { kind } => json!({ "type": kind }),
        }
    }
}

impl From<Value> for Step {
    fn from(value: Value) -> Self {
        Step::from_value(&value)
    }
}

impl From<Step> for Value {
    fn from(step: Step) -> Self {
        step.to_value()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Database row for a stored scenario definition
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScenarioRecord {
    pub name: String,
    pub steps: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScenarioRecord {
    /// Convert into a runnable scenario; the stored steps must be a JSON array
    pub fn into_scenario(self) -> crate::utils::errors::Result<Scenario> {
        let steps: Vec<Step> = serde_json::from_value(self.steps)?;
        Ok(Scenario::new(self.name, steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_is_message() {
        let step: Step = serde_json::from_value(json!("Hi there")).unwrap();
        assert_eq!(step, Step::message("Hi there"));
    }

    #[test]
    fn test_structured_steps_parse() {
        let steps: Vec<Step> = serde_json::from_value(json!([
            {"type": "message", "content": "Hello"},
            {"type": "input_text", "prompt": "Your name?", "save_as": "name"},
            {"type": "api_call", "url": "https://example.com/hook", "method": "post", "body": {"name": "{{name}}"}},
        ]))
        .unwrap();

        assert_eq!(steps[0], Step::message("Hello"));
        assert_eq!(steps[1], Step::input_text("Your name?", "name"));
        assert_eq!(
            steps[2],
            Step::api_call("https://example.com/hook", HttpMethod::Post, Some(json!({"name": "{{name}}"})))
        );
    }

    #[test]
    fn test_api_call_defaults_to_get_without_body() {
        let step = Step::from_value(&json!({"type": "api_call", "url": "https://example.com", "body": null}));
        assert_eq!(step, Step::api_call("https://example.com", HttpMethod::Get, None));
    }

    #[test]
    fn test_unrecognized_steps_become_unknown() {
        assert_eq!(Step::from_value(&json!({"type": "carousel"})), Step::Unknown { kind: "carousel".to_string() });
        assert_eq!(Step::from_value(&json!({"content": "no tag"})), Step::Unknown { kind: "untyped".to_string() });
        assert_eq!(Step::from_value(&json!(42)), Step::Unknown { kind: "number".to_string() });
        assert_eq!(
            Step::from_value(&json!({"type": "api_call", "url": "https://x", "method": "DELETE"})),
            Step::Unknown { kind: "api_call:DELETE".to_string() }
        );
        assert_eq!(
            Step::from_value(&json!({"type": "api_call"})),
            Step::Unknown { kind: "api_call:missing_url".to_string() }
        );
    }

    #[test]
    fn test_save_as_is_trimmed() {
        let step = Step::from_value(&json!({"type": "input_text", "prompt": "?", "save_as": " 名前 "}));
        assert_eq!(step, Step::input_text("?", "名前"));
    }

    #[test]
    fn test_blank_save_as_is_missing() {
        let step = Step::from_value(&json!({"type": "input_text", "prompt": "Age?", "save_as": "  "}));
        assert_eq!(step, Step::InputText { prompt: "Age?".to_string(), save_as: None });
    }

    #[test]
    fn test_scenario_serializes_structured_steps() {
        let scenario = Scenario::new("welcome", vec![Step::message("Hi"), Step::Unknown { kind: "sticker".to_string() }]);
        let value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(value["steps"][0], json!({"type": "message", "content": "Hi"}));
        assert_eq!(value["steps"][1], json!({"type": "sticker"}));
        let back: Scenario = serde_json::from_value(value).unwrap();
        assert_eq!(back, scenario);
    }

    #[test]
    fn test_record_with_non_array_steps_fails() {
        let record = ScenarioRecord {
            name: "broken".to_string(),
            steps: json!({"type": "message"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(record.into_scenario().is_err());
    }
}
