use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Appointment;

/// Calendar event kind. `Class` events are derived from Approved
/// appointments at read time and never stored; `Personal` events are owned
/// records the user creates and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Class,
    Personal,
}

/// An entry on a user's calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

impl CalendarEvent {
    /// Creates a personal event owned by `user_id`.
    pub fn personal(user_id: Uuid, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            date,
            kind: EventKind::Personal,
            description: None,
            meeting_link: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Projects an approved appointment onto the requester's calendar.
    /// The event shares the appointment's id so repeated projections are
    /// stable.
    pub fn from_appointment(appt: &Appointment) -> Self {
        Self {
            id: appt.id,
            user_id: appt.user_id,
            title: appt.topic.clone(),
            date: appt.date,
            kind: EventKind::Class,
            description: None,
            meeting_link: appt.meeting_link.clone(),
        }
    }
}

/// A study material attached to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub kind: String,
    pub url: String,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

impl Material {
    pub fn new(
        course_id: Uuid,
        title: impl Into<String>,
        kind: impl Into<String>,
        url: impl Into<String>,
        uploaded_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_id,
            title: title.into(),
            kind: kind.into(),
            url: url.into(),
            uploaded_by,
            uploaded_at: Utc::now(),
        }
    }
}
