use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Which part of the portal produced the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    System,
    Enrollment,
    Message,
    Meeting,
    Appointment,
    Timesheet,
    Leave,
}

/// An in-app notification for a single recipient.
///
/// Created unread; mutated only by the read/delete operations. The read
/// flag is monotonic — there is no unread-again transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    #[serde(default)]
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        category: NotificationCategory,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            message: message.into(),
            kind,
            category,
            read: false,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let n = Notification::new(
            Uuid::new_v4(),
            "Appointment Approved",
            "Your class was approved",
            NotificationKind::Success,
            NotificationCategory::Appointment,
        );
        assert!(!n.read);
    }

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(serde_json::to_string(&NotificationKind::Warning).unwrap(), "\"warning\"");
        let cat: NotificationCategory = serde_json::from_str("\"timesheet\"").unwrap();
        assert_eq!(cat, NotificationCategory::Timesheet);
    }

    #[test]
    fn test_read_flag_defaults_false_on_deserialize() {
        let json = format!(
            r#"{{"id":"{}","userId":"{}","title":"t","message":"m","kind":"info","category":"system","timestamp":"2025-01-01T00:00:00Z"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let n: Notification = serde_json::from_str(&json).unwrap();
        assert!(!n.read);
    }
}
