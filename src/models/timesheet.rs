use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review decision shared by time logs and leave requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// Write phase of an optimistic local-first record.
///
/// New records are written to the local store as `Tentative` before the
/// server call; the acknowledgment promotes them to `Confirmed`, and a
/// server rejection rolls the tentative record back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteState {
    Tentative,
    Confirmed,
}

impl Default for WriteState {
    fn default() -> Self {
        WriteState::Confirmed
    }
}

/// A logged block of working hours awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub hours: f64,
    pub activity: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl TimeLog {
    pub fn new(user_id: Uuid, date: NaiveDate, hours: f64, activity: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            hours,
            activity: activity.into(),
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// A leave request over a date range, reviewed by an admin/trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Two-phase write marker; not part of the wire payload.
    #[serde(default)]
    pub write_state: WriteState,
}

impl LeaveRequest {
    pub fn new(
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            start_date,
            end_date,
            reason: reason.into(),
            status: ReviewStatus::Pending,
            reviewed_by: None,
            comments: None,
            created_at: Utc::now(),
            write_state: WriteState::Tentative,
        }
    }
}
