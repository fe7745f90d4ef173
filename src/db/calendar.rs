//! Calendar events and course materials.
//!
//! A user's calendar is a merge of two sources: Personal events they own in
//! the local store, and Class events projected from their Approved
//! appointments at read time. Class events are views, not records — they
//! cannot be created or deleted here.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{AppointmentStatus, CalendarEvent, EventKind, Material};
use crate::store::keys;

use super::Database;

impl Database {
    /// Everything on a user's calendar, ordered by date.
    pub async fn calendar_events(&self, user: Uuid) -> Result<Vec<CalendarEvent>> {
        let mut events: Vec<CalendarEvent> = self
            .local
            .get(keys::CALENDAR_EVENTS)
            .into_iter()
            .filter(|e: &CalendarEvent| e.user_id == user)
            .collect();

        let classes = self
            .list_appointments(Some(user))
            .await?
            .into_iter()
            .filter(|a| a.status == AppointmentStatus::Approved && a.user_id == user)
            .map(|a| CalendarEvent::from_appointment(&a));
        events.extend(classes);

        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    pub async fn add_personal_event(&self, event: CalendarEvent) -> Result<()> {
        if event.kind != EventKind::Personal {
            return Err(Error::Validation(
                "only personal events can be created directly".into(),
            ));
        }
        if event.title.trim().is_empty() {
            return Err(Error::Validation("event title is required".into()));
        }

        self.local.append(keys::CALENDAR_EVENTS, event)?;
        self.changed();
        Ok(())
    }

    /// Deletes a personal event the user owns. Class events are not stored
    /// and therefore not deletable — they disappear with their
    /// appointment.
    pub async fn delete_personal_event(&self, id: Uuid) -> Result<()> {
        let mut found = false;
        self.local
            .update(keys::CALENDAR_EVENTS, |events: &mut Vec<CalendarEvent>| {
                let before = events.len();
                events.retain(|e| e.id != id);
                found = events.len() != before;
            })?;

        if !found {
            return Err(Error::NotFound {
                kind: "calendar event",
                id,
            });
        }

        self.changed();
        Ok(())
    }

    // --- materials ---

    pub fn materials(&self) -> Vec<Material> {
        self.local.get(keys::MATERIALS)
    }

    pub async fn add_material(&self, material: Material) -> Result<()> {
        if material.url.trim().is_empty() {
            return Err(Error::Validation("material url is required".into()));
        }

        self.local.append(keys::MATERIALS, material)?;
        self.changed();
        Ok(())
    }
}
