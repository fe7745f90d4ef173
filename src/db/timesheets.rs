//! Time logs and leave requests.
//!
//! Time logs have no live endpoint and live entirely in the local store.
//! Leave requests use an explicit two-phase write: the record lands locally
//! as Tentative, the server acknowledgment promotes it to Confirmed, and a
//! server rejection rolls the tentative record back out. A plain network
//! failure keeps the tentative copy — offline work is not discarded.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    LeaveRequest, Notification, NotificationCategory, NotificationKind, ReviewStatus, TimeLog,
    WriteState,
};
use crate::notify::{templates, Channel};
use crate::store::{keys, ApiClient};

use super::Database;

impl Database {
    // --- time logs ---

    pub fn time_logs(&self, user: Option<Uuid>) -> Vec<TimeLog> {
        let logs: Vec<TimeLog> = self.local.get(keys::TIME_LOGS);
        match user {
            Some(id) => logs.into_iter().filter(|l| l.user_id == id).collect(),
            None => logs,
        }
    }

    pub async fn add_time_log(&self, log: TimeLog) -> Result<()> {
        if log.hours <= 0.0 {
            return Err(Error::Validation("logged hours must be positive".into()));
        }
        if log.activity.trim().is_empty() {
            return Err(Error::Validation("activity description is required".into()));
        }

        self.local.append(keys::TIME_LOGS, log)?;
        self.changed();
        Ok(())
    }

    /// Reviews a time log and tells the owner. An approval also goes out
    /// over the delivery channels.
    pub async fn update_time_log_status(&self, id: Uuid, status: ReviewStatus) -> Result<()> {
        let log = self
            .time_logs(None)
            .into_iter()
            .find(|l| l.id == id)
            .ok_or(Error::NotFound { kind: "time log", id })?;

        self.local.update(keys::TIME_LOGS, |logs: &mut Vec<TimeLog>| {
            if let Some(l) = logs.iter_mut().find(|l| l.id == id) {
                l.status = status;
            }
        })?;

        let (title, kind) = match status {
            ReviewStatus::Approved => ("Timesheet Approved", NotificationKind::Success),
            ReviewStatus::Rejected => ("Timesheet Rejected", NotificationKind::Warning),
            ReviewStatus::Pending => ("Timesheet Updated", NotificationKind::Info),
        };
        self.create_notification(Notification::new(
            log.user_id,
            title,
            format!("{} hours on {}", log.hours, log.date),
            kind,
            NotificationCategory::Timesheet,
        ))
        .await?;

        if status == ReviewStatus::Approved {
            if let Ok(owner) = self.get_user(log.user_id).await {
                let rendered = templates::timesheet_approved(&owner.name, log.hours, log.date);
                if !self.notifier().send(Channel::Email, &owner.email, &rendered).await {
                    tracing::warn!("timesheet email to {} failed", owner.email);
                }
            }
        }

        self.changed();
        Ok(())
    }

    // --- leave requests ---

    pub fn leave_requests(&self, user: Option<Uuid>) -> Vec<LeaveRequest> {
        let requests: Vec<LeaveRequest> = self.local.get(keys::LEAVE_REQUESTS);
        match user {
            Some(id) => requests.into_iter().filter(|r| r.user_id == id).collect(),
            None => requests,
        }
    }

    /// Two-phase create: tentative local write, then the server call
    /// decides between confirm, rollback, and keep-tentative.
    pub async fn add_leave_request(&self, request: LeaveRequest) -> Result<()> {
        if request.end_date < request.start_date {
            return Err(Error::Validation(
                "leave end date precedes start date".into(),
            ));
        }

        let id = request.id;
        let mut tentative = request;
        tentative.write_state = WriteState::Tentative;
        self.local.append(keys::LEAVE_REQUESTS, tentative.clone())?;
        self.changed();

        let api = match self.api() {
            Some(api) => api,
            // Local-only facade: the record is immediately authoritative.
            None => {
                self.set_leave_write_state(id, WriteState::Confirmed)?;
                return Ok(());
            }
        };

        match api.post("/leave-requests", &tentative).await {
            Ok(()) => {
                self.set_leave_write_state(id, WriteState::Confirmed)?;
                self.changed();
                Ok(())
            }
            Err(e) if ApiClient::is_rejection(&e) => {
                // Server refused the record: roll the tentative write back
                self.local
                    .update(keys::LEAVE_REQUESTS, |items: &mut Vec<LeaveRequest>| {
                        items.retain(|r| r.id != id);
                    })?;
                self.changed();
                Err(e)
            }
            Err(e) => {
                // Unreachable server: keep the tentative record for a later sync
                tracing::warn!("leave request kept tentative, server unreachable: {}", e);
                Ok(())
            }
        }
    }

    pub async fn update_leave_request_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        reviewed_by: Uuid,
        comments: Option<String>,
    ) -> Result<()> {
        let request = self
            .leave_requests(None)
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(Error::NotFound {
                kind: "leave request",
                id,
            })?;

        self.local
            .update(keys::LEAVE_REQUESTS, |items: &mut Vec<LeaveRequest>| {
                if let Some(r) = items.iter_mut().find(|r| r.id == id) {
                    r.status = status;
                    r.reviewed_by = Some(reviewed_by);
                    r.comments = comments.clone();
                }
            })?;

        if let Some(api) = self.api() {
            let body = serde_json::json!({
                "status": status,
                "reviewedBy": reviewed_by,
                "comments": comments,
            });
            if let Err(e) = api.patch(&format!("/leave-requests/{}", id), &body).await {
                tracing::warn!("leave review mirror failed, kept local: {}", e);
            }
        }

        let (title, kind) = match status {
            ReviewStatus::Approved => ("Leave Request Approved", NotificationKind::Success),
            ReviewStatus::Rejected => ("Leave Request Rejected", NotificationKind::Warning),
            ReviewStatus::Pending => ("Leave Request Updated", NotificationKind::Info),
        };
        self.create_notification(Notification::new(
            request.user_id,
            title,
            format!("{} to {}", request.start_date, request.end_date),
            kind,
            NotificationCategory::Leave,
        ))
        .await?;

        if status == ReviewStatus::Approved {
            if let Ok(owner) = self.get_user(request.user_id).await {
                let rendered =
                    templates::leave_approved(&owner.name, request.start_date, request.end_date);
                if !self.notifier().send(Channel::Email, &owner.email, &rendered).await {
                    tracing::warn!("leave email to {} failed", owner.email);
                }
            }
        }

        self.changed();
        Ok(())
    }

    fn set_leave_write_state(&self, id: Uuid, state: WriteState) -> Result<()> {
        self.local
            .update(keys::LEAVE_REQUESTS, |items: &mut Vec<LeaveRequest>| {
                if let Some(r) = items.iter_mut().find(|r| r.id == id) {
                    r.write_state = state;
                }
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::local_db;
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[tokio::test]
    async fn test_add_and_filter_time_logs() {
        let (db, _dir) = local_db();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        db.add_time_log(TimeLog::new(alice, date(1), 4.0, "Lessons"))
            .await
            .unwrap();
        db.add_time_log(TimeLog::new(bob, date(1), 2.0, "Prep"))
            .await
            .unwrap();

        assert_eq!(db.time_logs(None).len(), 2);
        assert_eq!(db.time_logs(Some(alice)).len(), 1);
    }

    #[tokio::test]
    async fn test_nonpositive_hours_rejected() {
        let (db, _dir) = local_db();
        let err = db
            .add_time_log(TimeLog::new(Uuid::new_v4(), date(1), 0.0, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_time_log_review_notifies_owner() {
        let (db, _dir) = local_db();
        let owner = Uuid::new_v4();

        let log = TimeLog::new(owner, date(2), 6.0, "Teaching");
        let id = log.id;
        db.add_time_log(log).await.unwrap();

        db.update_time_log_status(id, ReviewStatus::Approved).await.unwrap();

        assert_eq!(db.time_logs(Some(owner))[0].status, ReviewStatus::Approved);
        let notifications = db.notifications(owner);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].category, NotificationCategory::Timesheet);
    }

    #[tokio::test]
    async fn test_leave_request_local_only_confirms() {
        let (db, _dir) = local_db();
        let owner = Uuid::new_v4();

        db.add_leave_request(LeaveRequest::new(owner, date(1), date(3), "Trip"))
            .await
            .unwrap();

        let requests = db.leave_requests(Some(owner));
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].write_state, WriteState::Confirmed);
        assert_eq!(requests[0].status, ReviewStatus::Pending);
    }

    #[tokio::test]
    async fn test_leave_request_invalid_range_rejected() {
        let (db, _dir) = local_db();
        let err = db
            .add_leave_request(LeaveRequest::new(Uuid::new_v4(), date(5), date(1), "Trip"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(db.leave_requests(None).is_empty());
    }

    #[tokio::test]
    async fn test_leave_review_records_reviewer_and_notifies() {
        let (db, _dir) = local_db();
        let (owner, reviewer) = (Uuid::new_v4(), Uuid::new_v4());

        let request = LeaveRequest::new(owner, date(1), date(2), "Family");
        let id = request.id;
        db.add_leave_request(request).await.unwrap();

        db.update_leave_request_status(id, ReviewStatus::Approved, reviewer, Some("Enjoy".into()))
            .await
            .unwrap();

        let reviewed = &db.leave_requests(Some(owner))[0];
        assert_eq!(reviewed.status, ReviewStatus::Approved);
        assert_eq!(reviewed.reviewed_by, Some(reviewer));
        assert_eq!(reviewed.comments.as_deref(), Some("Enjoy"));
        assert_eq!(db.unread_count(owner), 1);
    }
}
