use chrono::Utc;
use serde::{Deserialize, Serialize};

/// How long a notification stays visible, in milliseconds
pub const NOTIFICATION_TTL_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self {
            id: format!("{}-{:08x}", timestamp, rand::random::<u32>()),
            message: message.into(),
            kind,
            timestamp,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() - self.timestamp >= NOTIFICATION_TTL_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_not_expired() {
        let n = Notification::new("hello", NotificationKind::Info);
        assert!(!n.is_expired());
        assert!(n.id.starts_with(&n.timestamp.to_string()));
    }

    #[test]
    fn test_serialized_shape() {
        let n = Notification {
            id: "1-abc".into(),
            message: "m".into(),
            kind: NotificationKind::Warning,
            timestamp: 1,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["timestamp"], 1);
    }
}
