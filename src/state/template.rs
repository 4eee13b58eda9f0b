//! Variable substitution for step content
//!
//! Placeholders look like `{{name}}`; a name is any text without braces,
//! trimmed, so `{{名前}}` and `{{ first name }}` both work. Unknown
//! placeholders are left as they are, and substituted values are never
//! scanned again, so a value that looks like a placeholder is inserted
//! literally.

use std::borrow::Cow;
use std::sync::OnceLock;
use regex::{Captures, Regex};
use serde_json::Value;
use crate::models::Variables;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Substitute variables into a piece of text
pub fn substitute_text(text: &str, variables: &Variables) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }

    let replaced: Cow<'_, str> = placeholder_pattern().replace_all(text, |caps: &Captures<'_>| {
        match variables.get(caps[1].trim()) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        }
    });

    replaced.into_owned()
}

/// Substitute variables into every string reachable through objects and arrays
pub fn substitute_value(value: &Value, variables: &Variables) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_text(s, variables)),
        Value::Array(items) => Value::Array(
            items.iter()
                .map(|item| substitute_value(item, variables))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), substitute_value(item, variables)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_substitutes_known_variable() {
        assert_eq!(substitute_text("Hello {{name}}", &vars(&[("name", "World")])), "Hello World");
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let variables = vars(&[("name", "World")]);
        for text in ["", "plain text", "braces { } and }} {{", "{{ }}"] {
            assert_eq!(substitute_text(text, &variables), text);
        }
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let variables = vars(&[("name", "Alice")]);
        assert_eq!(
            substitute_text("{{name}} lives in {{city}}", &variables),
            "Alice lives in {{city}}"
        );
    }

    #[test]
    fn test_whitespace_inside_braces_and_repeats() {
        let variables = vars(&[("name", "Bo")]);
        assert_eq!(substitute_text("{{ name }}, {{name}}!", &variables), "Bo, Bo!");
    }

    #[test]
    fn test_non_ascii_and_spaced_names() {
        let variables = vars(&[("名前", "Alice"), ("first name", "Bo")]);
        assert_eq!(substitute_text("こんにちは {{名前}}", &variables), "こんにちは Alice");
        assert_eq!(substitute_text("Hi {{ first name }}!", &variables), "Hi Bo!");
        assert_eq!(substitute_text("{{ last name }}", &variables), "{{ last name }}");
    }

    #[test]
    fn test_values_are_not_substituted_twice() {
        let variables = vars(&[("a", "{{b}}"), ("b", "boom")]);
        assert_eq!(substitute_text("{{a}}", &variables), "{{b}}");

        let variables = vars(&[("a", "{{a}}")]);
        assert_eq!(substitute_text("x{{a}}x", &variables), "x{{a}}x");
    }

    #[test]
    fn test_structured_substitution_preserves_shape() {
        let variables = vars(&[("name", "Alice"), ("id", "7")]);
        let body = json!({
            "user": {"name": "{{name}}", "tags": ["{{id}}", "static", 3]},
            "active": true,
            "score": 1.5,
            "note": null
        });

        let result = substitute_value(&body, &variables);
        assert_eq!(result, json!({
            "user": {"name": "Alice", "tags": ["7", "static", 3]},
            "active": true,
            "score": 1.5,
            "note": null
        }));
    }

    #[test]
    fn test_object_keys_are_not_substituted() {
        let variables = vars(&[("k", "v")]);
        let result = substitute_value(&json!({"{{k}}": "{{k}}"}), &variables);
        assert_eq!(result, json!({"{{k}}": "v"}));
    }
}
