// Helper functions for safe logging and display formatting

use chrono::{DateTime, NaiveDateTime};

const WORDS_PER_MINUTE: f64 = 200.0;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            let first = parts[0].chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
///
/// # Example
/// ```ignore
/// let masked = safe_token_log("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
/// // Returns: "eyJh...CJ9"
/// ```
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Approximate reading time in minutes, never less than one
pub fn read_time_minutes(text: &str) -> u32 {
    let minutes = (word_count(text) as f64 / WORDS_PER_MINUTE).round() as u32;
    minutes.max(1)
}

/// Cover images served by the Pexels CDN carry a Pexels attribution
pub fn is_from_pexels(url: &str) -> bool {
    url.contains("images.pexels.com")
}

pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// "January 5, 2024" for an API timestamp; the raw value if it does not parse
pub fn format_date(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// "January 5, 2024, 09:30" for an API timestamp
pub fn format_date_time(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|dt| dt.format("%B %-d, %Y, %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

// The API emits RFC 3339 with offset, older records may be naive ISO strings
fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
