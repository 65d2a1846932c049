// Small helpers shared across the engine and the chat bot.
use chrono::{DateTime, Utc};

/// Converts an upstream millisecond timestamp; `None` when out of range.
pub fn datetime_from_millis(ts_millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_millis)
}

/// Formats a price for chat replies: up to 8 decimals, trailing zeros trimmed.
pub fn format_price(price: f64) -> String {
    let formatted = format!("{:.8}", price);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
