//! Appointment completion sweep.
//!
//! Approved sessions whose start time has passed are promoted to Completed
//! on a fixed cadence. The sweep is idempotent: a rerun over already
//! completed records changes nothing and reports zero.

use std::time::Duration;

use chrono::Utc;

use crate::db::Database;
use crate::error::Result;
use crate::models::{AppointmentStatus, StatusUpdate};

use super::subscription::TaskHandle;

/// Default cadence for [`spawn_completion_sweep`].
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One pass over the appointments: every Approved record whose start has
/// passed becomes Completed. Returns the number promoted.
pub async fn run_sweep(db: &Database) -> Result<usize> {
    let now = Utc::now().naive_utc();
    let due: Vec<_> = db
        .list_appointments(None)
        .await?
        .into_iter()
        .filter(|a| a.status == AppointmentStatus::Approved && a.is_past_due(now))
        .collect();

    for appointment in &due {
        db.update_appointment_status(
            appointment.id,
            AppointmentStatus::Completed,
            StatusUpdate::default(),
        )
        .await?;
    }

    if !due.is_empty() {
        tracing::info!("completion sweep promoted {} appointment(s)", due.len());
    }
    Ok(due.len())
}

/// Runs [`run_sweep`] on a fixed interval until the handle is dropped or
/// stopped. Sweep failures are logged and the next tick tries again.
pub fn spawn_completion_sweep(db: Database, every: Duration) -> TaskHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick fires immediately; skip it so the sweep waits a full
        // interval after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = run_sweep(&db).await {
                tracing::warn!("completion sweep failed: {}", e);
            }
        }
    });

    TaskHandle::new(task)
}
