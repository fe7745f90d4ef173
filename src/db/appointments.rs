//! Appointment operations.
//!
//! Status transitions here are caller-authorized: the facade checks record
//! shape and referential integrity, not roles. Approval and rejection also
//! create an in-app notification for the requesting student and hand a
//! rendered message to the delivery channels; a delivery failure is logged
//! and can never fail the transition itself.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    Appointment, AppointmentStatus, Notification, NotificationCategory, NotificationKind,
    StatusUpdate,
};
use crate::notify::{templates, Channel};
use crate::store::keys;

use super::Database;

/// Wire body for `PATCH /appointments/:id`.
#[derive(Serialize)]
struct AppointmentPatch<'a> {
    status: AppointmentStatus,
    #[serde(flatten)]
    extra: &'a StatusUpdate,
}

impl Database {
    /// Lists appointments ordered by schedule, earliest first. With a user filter the
    /// result covers appointments the user requested or is assigned to as
    /// trainer, matching the remote `?userId=` filter.
    pub async fn list_appointments(&self, user: Option<Uuid>) -> Result<Vec<Appointment>> {
        let mut appointments = match user {
            None => {
                self.fetch_or_local("/appointments", keys::APPOINTMENTS)
                    .await?
            }
            Some(id) => match self.api() {
                Some(api) => {
                    match api
                        .get::<Vec<Appointment>>(&format!("/appointments?userId={}", id))
                        .await
                    {
                        Ok(items) => items,
                        Err(e) if self.local.exists(keys::APPOINTMENTS) => {
                            tracing::warn!("appointment fetch failed, using local fallback: {}", e);
                            filter_for_user(self.local.get(keys::APPOINTMENTS), id)
                        }
                        Err(e) => return Err(e),
                    }
                }
                None => filter_for_user(self.local.get(keys::APPOINTMENTS), id),
            },
        };

        appointments.sort_by_key(|a| a.scheduled_at());
        Ok(appointments)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment> {
        self.list_appointments(None)
            .await?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(Error::NotFound {
                kind: "appointment",
                id,
            })
    }

    /// Submits a new appointment request. The id is assigned client-side
    /// before transmission; the record starts Pending.
    pub async fn request_appointment(&self, appointment: Appointment) -> Result<()> {
        if appointment.topic.trim().is_empty() {
            return Err(Error::Validation("appointment topic is required".into()));
        }

        // Referential integrity before any write
        self.get_user(appointment.user_id).await?;
        self.get_course(appointment.course_id).await?;

        if let Some(api) = self.api() {
            api.post("/appointments", &appointment).await?;
        }

        self.local.append(keys::APPOINTMENTS, appointment)?;
        self.changed();
        Ok(())
    }

    /// Applies a status transition plus any extra fields (meeting link,
    /// rejection reason). No role check happens here.
    pub async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        extra: StatusUpdate,
    ) -> Result<()> {
        if let Some(api) = self.api() {
            let patch = AppointmentPatch {
                status,
                extra: &extra,
            };
            api.patch(&format!("/appointments/{}", id), &patch).await?;
        } else if !self
            .local
            .get::<Appointment>(keys::APPOINTMENTS)
            .iter()
            .any(|a| a.id == id)
        {
            return Err(Error::NotFound {
                kind: "appointment",
                id,
            });
        }

        self.local
            .update(keys::APPOINTMENTS, |items: &mut Vec<Appointment>| {
                if let Some(appt) = items.iter_mut().find(|a| a.id == id) {
                    appt.status = status;
                    if let Some(link) = &extra.meeting_link {
                        appt.meeting_link = Some(link.clone());
                    }
                    if let Some(reason) = &extra.rejection_reason {
                        appt.rejection_reason = Some(reason.clone());
                    }
                    if let Some(trainer) = extra.trainer_id {
                        appt.trainer_id = Some(trainer);
                    }
                }
            })?;

        self.changed();
        Ok(())
    }

    /// Approves an appointment, optionally attaching a meeting link, then
    /// notifies the student in-app and over the delivery channels.
    pub async fn approve_appointment(&self, id: Uuid, meeting_link: Option<String>) -> Result<()> {
        let extra = StatusUpdate {
            meeting_link,
            ..StatusUpdate::default()
        };
        self.update_appointment_status(id, AppointmentStatus::Approved, extra)
            .await?;

        let appointment = self.get_appointment(id).await?;
        self.create_notification(Notification::new(
            appointment.user_id,
            "Appointment Approved",
            format!(
                "Your class \"{}\" on {} at {} has been approved.",
                appointment.topic, appointment.date, appointment.time
            ),
            NotificationKind::Success,
            NotificationCategory::Appointment,
        ))
        .await?;

        self.deliver_to_student(&appointment, |name| {
            templates::appointment_approved(
                name,
                &appointment.topic,
                appointment.date,
                appointment.time,
                appointment.meeting_link.as_deref(),
            )
        })
        .await;

        Ok(())
    }

    /// Approves a cluster of requests as one group session, every
    /// appointment sharing the same meeting link. Each requester gets their
    /// own notification and delivery.
    pub async fn approve_group_session(
        &self,
        ids: &[Uuid],
        meeting_link: Option<String>,
    ) -> Result<()> {
        for &id in ids {
            self.approve_appointment(id, meeting_link.clone()).await?;
        }
        Ok(())
    }

    /// Attaches or replaces the meeting link on an existing appointment
    /// without touching its status, then tells the student where to join.
    pub async fn update_meeting_link(&self, id: Uuid, link: impl Into<String>) -> Result<()> {
        let link = link.into();
        let current = self.get_appointment(id).await?;
        self.update_appointment_status(id, current.status, StatusUpdate::meeting_link(link.clone()))
            .await?;

        let appointment = self.get_appointment(id).await?;
        self.create_notification(Notification::new(
            appointment.user_id,
            "Meeting Link Ready",
            format!("Join \"{}\" here: {}", appointment.topic, link),
            NotificationKind::Info,
            NotificationCategory::Meeting,
        ))
        .await?;

        let description = self
            .get_course(appointment.course_id)
            .await
            .map(|c| c.description)
            .unwrap_or_default();
        self.deliver_to_student(&appointment, |name| {
            templates::meeting_link_ready(name, &appointment.topic, &link, &description)
        })
        .await;

        Ok(())
    }

    /// Rejects an appointment with a reason, then notifies the student.
    pub async fn reject_appointment(&self, id: Uuid, reason: &str) -> Result<()> {
        self.update_appointment_status(
            id,
            AppointmentStatus::Rejected,
            StatusUpdate::rejection_reason(reason),
        )
        .await?;

        let appointment = self.get_appointment(id).await?;
        self.create_notification(Notification::new(
            appointment.user_id,
            "Appointment Update",
            format!(
                "Your class \"{}\" could not be approved: {}",
                appointment.topic, reason
            ),
            NotificationKind::Warning,
            NotificationCategory::Appointment,
        ))
        .await?;

        self.deliver_to_student(&appointment, |name| {
            templates::appointment_rejected(name, &appointment.topic, Some(reason))
        })
        .await;

        Ok(())
    }

    pub async fn delete_appointment(&self, id: Uuid) -> Result<()> {
        if let Some(api) = self.api() {
            api.delete(&format!("/appointments/{}", id)).await?;
        }

        self.local
            .update(keys::APPOINTMENTS, |items: &mut Vec<Appointment>| {
                items.retain(|a| a.id != id);
            })?;

        self.changed();
        Ok(())
    }

    /// Renders a message for the appointment's student and hands it to the
    /// email channel. Lookup or delivery failures are logged; the business
    /// operation already succeeded.
    async fn deliver_to_student<F>(&self, appointment: &Appointment, render: F)
    where
        F: FnOnce(&str) -> templates::Rendered,
    {
        let student = match self.get_user(appointment.user_id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("skipping delivery, student lookup failed: {}", e);
                return;
            }
        };

        let rendered = render(&student.name);
        if !self
            .notifier()
            .send(Channel::Email, &student.email, &rendered)
            .await
        {
            tracing::warn!("email delivery to {} failed", student.email);
        }
    }
}

fn filter_for_user(appointments: Vec<Appointment>, user: Uuid) -> Vec<Appointment> {
    appointments
        .into_iter()
        .filter(|a| a.user_id == user || a.trainer_id == Some(user))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::testutil::local_db;
    use super::*;
    use crate::models::{Course, CourseStatus, Role, User};
    use chrono::{NaiveDate, NaiveTime};

    async fn seed_student_and_course(db: &Database) -> (Uuid, Uuid) {
        let student = User::new("Ada", "ada@example.com", Role::Student);
        let student_id = student.id;
        db.add_user(Role::Admin, student).await.unwrap();

        let course = Course::new("English B2", "B2").with_status(CourseStatus::Active);
        let course_id = course.id;
        db.add_course(course).await.unwrap();

        (student_id, course_id)
    }

    fn request(student: Uuid, course: Uuid) -> Appointment {
        Appointment::new(
            student,
            course,
            "Review",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_request_appointment_is_pending_and_listed() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let appt = request(student, course);
        let id = appt.id;
        db.request_appointment(appt).await.unwrap();

        let listed = db.list_appointments(Some(student)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].status, AppointmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_request_requires_topic() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let mut appt = request(student, course);
        appt.topic = "   ".to_string();

        let err = db.request_appointment(appt).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(db.list_appointments(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_requires_existing_course() {
        let (db, _dir) = local_db();
        let (student, _) = seed_student_and_course(&db).await;

        let appt = request(student, Uuid::new_v4());
        let err = db.request_appointment(appt).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "course", .. }));
    }

    #[tokio::test]
    async fn test_request_requires_existing_user() {
        let (db, _dir) = local_db();
        let (_, course) = seed_student_and_course(&db).await;

        let appt = request(Uuid::new_v4(), course);
        let err = db.request_appointment(appt).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "user", .. }));
    }

    #[tokio::test]
    async fn test_approve_sets_link_and_notifies_student() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let appt = request(student, course);
        let id = appt.id;
        db.request_appointment(appt).await.unwrap();

        db.approve_appointment(id, Some("https://meet.example/x".into()))
            .await
            .unwrap();

        let listed = db.list_appointments(None).await.unwrap();
        assert_eq!(listed[0].status, AppointmentStatus::Approved);
        assert_eq!(listed[0].meeting_link.as_deref(), Some("https://meet.example/x"));

        let notifications = db.notifications(student);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Appointment Approved");
        assert_eq!(notifications[0].category, NotificationCategory::Appointment);
    }

    #[tokio::test]
    async fn test_group_session_shares_one_link() {
        let (db, _dir) = local_db();
        let (ada, course) = seed_student_and_course(&db).await;

        let bea = User::new("Bea", "bea@example.com", Role::Student);
        let bea_id = bea.id;
        db.add_user(Role::Admin, bea).await.unwrap();

        let first = request(ada, course);
        let second = request(bea_id, course);
        let ids = [first.id, second.id];
        db.request_appointment(first).await.unwrap();
        db.request_appointment(second).await.unwrap();

        db.approve_group_session(&ids, Some("https://meet.example/group".into()))
            .await
            .unwrap();

        for appt in db.list_appointments(None).await.unwrap() {
            assert_eq!(appt.status, AppointmentStatus::Approved);
            assert_eq!(appt.meeting_link.as_deref(), Some("https://meet.example/group"));
        }
        assert_eq!(db.unread_count(ada), 1);
        assert_eq!(db.unread_count(bea_id), 1);
    }

    #[tokio::test]
    async fn test_update_meeting_link_keeps_status() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let appt = request(student, course);
        let id = appt.id;
        db.request_appointment(appt).await.unwrap();
        db.approve_appointment(id, None).await.unwrap();

        db.update_meeting_link(id, "https://meet.example/late")
            .await
            .unwrap();

        let updated = db.get_appointment(id).await.unwrap();
        assert_eq!(updated.status, AppointmentStatus::Approved);
        assert_eq!(updated.meeting_link.as_deref(), Some("https://meet.example/late"));

        let meeting = db
            .notifications(student)
            .into_iter()
            .find(|n| n.category == NotificationCategory::Meeting);
        assert!(meeting.is_some());
    }

    #[tokio::test]
    async fn test_reject_records_reason_and_notifies() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let appt = request(student, course);
        let id = appt.id;
        db.request_appointment(appt).await.unwrap();

        db.reject_appointment(id, "Trainer unavailable").await.unwrap();

        let listed = db.list_appointments(None).await.unwrap();
        assert_eq!(listed[0].status, AppointmentStatus::Rejected);
        assert_eq!(listed[0].rejection_reason.as_deref(), Some("Trainer unavailable"));
        assert_eq!(db.unread_count(student), 1);
    }

    #[tokio::test]
    async fn test_update_status_on_missing_appointment() {
        let (db, _dir) = local_db();

        let err = db
            .update_appointment_status(Uuid::new_v4(), AppointmentStatus::Approved, StatusUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "appointment", .. }));
    }

    #[tokio::test]
    async fn test_list_filters_by_requester_or_trainer() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let trainer = User::new("Tess", "tess@example.com", Role::Trainer);
        let trainer_id = trainer.id;
        db.add_user(Role::Admin, trainer).await.unwrap();

        let appt = request(student, course).with_trainer(trainer_id);
        db.request_appointment(appt).await.unwrap();
        db.request_appointment(request(student, course)).await.unwrap();

        assert_eq!(db.list_appointments(Some(student)).await.unwrap().len(), 2);
        assert_eq!(db.list_appointments(Some(trainer_id)).await.unwrap().len(), 1);
        assert!(db.list_appointments(Some(Uuid::new_v4())).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_schedule() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let mut late = request(student, course);
        late.date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let mut early = request(student, course);
        early.date = NaiveDate::from_ymd_opt(2025, 2, 20).unwrap();

        db.request_appointment(late).await.unwrap();
        db.request_appointment(early.clone()).await.unwrap();

        let listed = db.list_appointments(None).await.unwrap();
        assert_eq!(listed[0].id, early.id);
    }

    #[tokio::test]
    async fn test_delete_appointment() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;

        let appt = request(student, course);
        let id = appt.id;
        db.request_appointment(appt).await.unwrap();
        db.delete_appointment(id).await.unwrap();

        assert!(db.list_appointments(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_fire_change_signal() {
        let (db, _dir) = local_db();
        let (student, course) = seed_student_and_course(&db).await;
        let mut rx = db.signal().subscribe();

        db.request_appointment(request(student, course)).await.unwrap();
        assert!(rx.try_recv().is_ok());
    }
}
