use serde::{Deserialize, Serialize};

/// Selectable languages as (code, label)
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("ja", "Japanese"),
    ("zh", "Chinese"),
];

/// Selectable timezones as (IANA name, label)
pub const TIMEZONES: &[(&str, &str)] = &[
    ("UTC", "UTC (Coordinated Universal Time)"),
    ("America/New_York", "Eastern Time (ET)"),
    ("America/Chicago", "Central Time (CT)"),
    ("America/Denver", "Mountain Time (MT)"),
    ("America/Los_Angeles", "Pacific Time (PT)"),
    ("Europe/London", "London (GMT)"),
    ("Europe/Paris", "Paris (CET)"),
    ("Asia/Tokyo", "Tokyo (JST)"),
    ("Asia/Shanghai", "Shanghai (CST)"),
];

pub const EMAIL_DIGESTS: &[(&str, &str)] = &[
    ("realtime", "Real-time"),
    ("daily", "Daily"),
    ("weekly", "Weekly"),
    ("never", "Never"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
        }
    }
}

/// User preferences as persisted under `user_preferences`.
/// Missing fields fall back to their defaults when parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    pub dark_mode: bool,
    pub notifications: NotificationPreferences,
    pub language: String,
    pub timezone: String,
    pub email_digest: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: NotificationPreferences::default(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            email_digest: "daily".to_string(),
        }
    }
}

/// Display label for `value` in one of the option tables, falling back to
/// the raw value for anything not listed
pub fn option_label<'a>(options: &'a [(&'a str, &'a str)], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

/// The option after `value`, wrapping around. Unknown values start over
/// at the first option.
pub fn cycle_option(options: &[(&str, &str)], value: &str, forward: bool) -> String {
    if options.is_empty() {
        return value.to_string();
    }
    let len = options.len();
    let next = match options.iter().position(|(v, _)| *v == value) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options[next].0.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_serialize_camel_case() {
        let json = serde_json::to_value(UserPreferences::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "darkMode": false,
                "notifications": { "email": true, "push": true, "sms": false },
                "language": "en",
                "timezone": "UTC",
                "emailDigest": "daily"
            })
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"darkMode": true, "notifications": {"sms": true}}"#).unwrap();
        assert!(prefs.dark_mode);
        assert!(prefs.notifications.sms);
        assert!(prefs.notifications.email);
        assert_eq!(prefs.timezone, "UTC");
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label(LANGUAGES, "fr"), "French");
        assert_eq!(option_label(EMAIL_DIGESTS, "realtime"), "Real-time");
        assert_eq!(option_label(TIMEZONES, "Mars/Olympus"), "Mars/Olympus");
    }

    #[test]
    fn test_cycle_option_wraps() {
        assert_eq!(cycle_option(EMAIL_DIGESTS, "daily", true), "weekly");
        assert_eq!(cycle_option(EMAIL_DIGESTS, "never", true), "realtime");
        assert_eq!(cycle_option(EMAIL_DIGESTS, "realtime", false), "never");
        assert_eq!(cycle_option(LANGUAGES, "xx", true), "en");
    }
}
