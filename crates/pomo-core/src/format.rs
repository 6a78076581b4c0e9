//! Formatting utilities

use chrono::{DateTime, Local, NaiveDate};

/// Format a countdown as MM:SS (whole seconds, fractions dropped)
pub fn countdown(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format accumulated task time as M:SS
pub fn task_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format a timestamp as HH:MM
pub fn clock_time(dt: DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

/// Format a calendar day as dd/mm/YYYY
pub fn date_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
