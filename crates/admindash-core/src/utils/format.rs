use chrono::{DateTime, Local};

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format epoch milliseconds as local wall-clock time
pub fn format_timestamp(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Format a remaining duration given in minutes, e.g. "23h 59m"
pub fn format_remaining(minutes: i64) -> String {
    if minutes <= 0 {
        return "expired".to_string();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Hello", 2), "He");
        assert_eq!(truncate_string("Zoë Öberg", 9), "Zoë Öberg");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_700_000_000_000).len(), 8);
        assert_eq!(format_timestamp(i64::MAX), "--:--:--");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(1439), "23h 59m");
        assert_eq!(format_remaining(45), "45m");
        assert_eq!(format_remaining(0), "expired");
        assert_eq!(format_remaining(-5), "expired");
    }
}
