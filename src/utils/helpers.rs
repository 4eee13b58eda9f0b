//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a numeric user id from command arguments
pub fn parse_user_id(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Split command arguments into the first word and the untouched remainder
pub fn split_first_word(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => Some((head, rest.trim_start())),
        None => Some((trimmed, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
        assert_eq!(truncate_text("こんにちは世界", 5), "こん...");
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id(" 123456789 "), Some(123456789));
        assert_eq!(parse_user_id("@username"), None);
    }

    #[test]
    fn test_split_first_word() {
        assert_eq!(split_first_word("42 hello there"), Some(("42", "hello there")));
        assert_eq!(split_first_word("  welcome"), Some(("welcome", "")));
        assert_eq!(split_first_word("   "), None);
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2024-06-01 12:30:00 UTC");
    }
}
