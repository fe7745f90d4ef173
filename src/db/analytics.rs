//! Aggregate counts for the dashboard views.

use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AppointmentStatus, CourseStatus, Role};

use super::Database;

/// Portal-wide totals for admin and superadmin dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct SystemAnalytics {
    pub total_users: usize,
    pub total_students: usize,
    pub total_trainers: usize,
    pub total_admins: usize,
    pub active_courses: usize,
    pub total_appointments: usize,
    pub pending_appointments: usize,
    pub approved_appointments: usize,
    pub completed_appointments: usize,
}

/// A student's own booking summary.
#[derive(Debug, Clone, Serialize)]
pub struct StudentAnalytics {
    pub total_booked: usize,
    pub attended: usize,
    pub remaining: usize,
    /// Completed share of all booked sessions, 0-100.
    pub attendance_rate: u32,
}

/// A trainer's teaching summary.
#[derive(Debug, Clone, Serialize)]
pub struct TrainerAnalytics {
    pub total_students: usize,
    pub sessions_conducted: usize,
    pub upcoming: usize,
    pub teaching_hours: usize,
}

impl Database {
    pub async fn system_analytics(&self) -> Result<SystemAnalytics> {
        let users = self.list_users().await?;
        let courses = self.list_courses().await?;
        let appointments = self.list_appointments(None).await?;

        Ok(SystemAnalytics {
            total_users: users.len(),
            total_students: users.iter().filter(|u| u.role == Role::Student).count(),
            total_trainers: users.iter().filter(|u| u.role == Role::Trainer).count(),
            total_admins: users.iter().filter(|u| u.role == Role::Admin).count(),
            active_courses: courses
                .iter()
                .filter(|c| c.status == CourseStatus::Active)
                .count(),
            total_appointments: appointments.len(),
            pending_appointments: count_status(&appointments, AppointmentStatus::Pending),
            approved_appointments: count_status(&appointments, AppointmentStatus::Approved),
            completed_appointments: count_status(&appointments, AppointmentStatus::Completed),
        })
    }

    pub async fn student_analytics(&self, user: Uuid) -> Result<StudentAnalytics> {
        let appointments = self.list_appointments(Some(user)).await?;

        let total_booked = appointments.len();
        let attended = count_status(&appointments, AppointmentStatus::Completed);
        let remaining = appointments
            .iter()
            .filter(|a| {
                matches!(
                    a.status,
                    AppointmentStatus::Pending | AppointmentStatus::Approved
                )
            })
            .count();
        let attendance_rate = if total_booked > 0 {
            (attended as f64 * 100.0 / total_booked as f64).round() as u32
        } else {
            0
        };

        Ok(StudentAnalytics {
            total_booked,
            attended,
            remaining,
            attendance_rate,
        })
    }

    pub async fn trainer_analytics(&self, user: Uuid) -> Result<TrainerAnalytics> {
        let courses = self.list_courses().await?;
        let taught: Vec<Uuid> = courses
            .iter()
            .filter(|c| c.trainer_id == Some(user))
            .map(|c| c.id)
            .collect();

        let appointments = self.list_appointments(None).await?;
        let mine: Vec<_> = appointments
            .into_iter()
            .filter(|a| a.trainer_id == Some(user) || taught.contains(&a.course_id))
            .collect();

        let sessions_conducted = count_status(&mine, AppointmentStatus::Completed);
        let upcoming = mine
            .iter()
            .filter(|a| {
                matches!(
                    a.status,
                    AppointmentStatus::Pending | AppointmentStatus::Approved
                )
            })
            .count();
        let students: std::collections::HashSet<Uuid> = mine.iter().map(|a| a.user_id).collect();

        Ok(TrainerAnalytics {
            total_students: students.len(),
            sessions_conducted,
            upcoming,
            teaching_hours: sessions_conducted,
        })
    }
}

fn count_status(appointments: &[crate::models::Appointment], status: AppointmentStatus) -> usize {
    appointments.iter().filter(|a| a.status == status).count()
}
