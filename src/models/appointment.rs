use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Appointment lifecycle.
///
/// Pending → Approved | Rejected (trainer/admin decision),
/// Approved → Completed (completion sweep). Completed and Rejected are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl AppointmentStatus {
    /// Returns true if no further transition is allowed from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Rejected | AppointmentStatus::Completed)
    }
}

/// A requested class session.
///
/// Field names serialize camelCase to match the HTTP API; the local store
/// shares the same format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    /// The requesting student.
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub topic: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<Uuid>,
    /// Session length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        user_id: Uuid,
        course_id: Uuid,
        topic: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            topic: topic.into(),
            date,
            time,
            status: AppointmentStatus::Pending,
            trainer_id: None,
            duration: None,
            meeting_link: None,
            rejection_reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_trainer(mut self, trainer_id: Uuid) -> Self {
        self.trainer_id = Some(trainer_id);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// The scheduled start as a naive UTC timestamp.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// True when the scheduled start has passed. Used by the completion
    /// sweep to promote Approved sessions.
    pub fn is_past_due(&self, now: NaiveDateTime) -> bool {
        self.scheduled_at() <= now
    }
}

/// Optional fields attached to a status update (`PATCH /appointments/:id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<Uuid>,
}

impl StatusUpdate {
    pub fn meeting_link(link: impl Into<String>) -> Self {
        Self {
            meeting_link: Some(link.into()),
            ..Self::default()
        }
    }

    pub fn rejection_reason(reason: impl Into<String>) -> Self {
        Self {
            rejection_reason: Some(reason.into()),
            ..Self::default()
        }
    }
}
