//! In-app notifications and unread counts.
//!
//! The local store is authoritative for reads so badge counts work with or
//! without a server; creation is mirrored to the remote API best-effort.
//! Badge staleness across sessions is bounded by the polling interval and
//! is documented behavior, not a bug.

use serde_json::json;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Notification, NotificationCategory, NotificationKind};
use crate::store::keys;

use super::Database;

impl Database {
    /// Stores a notification and mirrors it to the server. The local write
    /// is the one that must succeed; a failed mirror is logged and never
    /// aborts the operation that produced the notification.
    pub async fn create_notification(&self, notification: Notification) -> Result<()> {
        self.mirror_remote("/notifications", &notification).await;
        self.local.append(keys::NOTIFICATIONS, notification)?;
        self.changed();
        Ok(())
    }

    /// A user's notifications, newest first.
    pub fn notifications(&self, user: Uuid) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .local
            .get(keys::NOTIFICATIONS)
            .into_iter()
            .filter(|n: &Notification| n.user_id == user)
            .collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items
    }

    pub fn unread_count(&self, user: Uuid) -> usize {
        self.notifications(user).iter().filter(|n| !n.read).count()
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<()> {
        if let Some(api) = self.api() {
            if let Err(e) = api.patch(&format!("/notifications/{}/read", id), &()).await {
                tracing::warn!("notification read mirror failed: {}", e);
            }
        }

        self.local
            .update(keys::NOTIFICATIONS, |items: &mut Vec<Notification>| {
                if let Some(n) = items.iter_mut().find(|n| n.id == id) {
                    n.read = true;
                }
            })?;

        self.changed();
        Ok(())
    }

    /// Marks every notification of `user` read; other users' badges are
    /// untouched.
    pub async fn mark_all_read(&self, user: Uuid) -> Result<()> {
        self.local
            .update(keys::NOTIFICATIONS, |items: &mut Vec<Notification>| {
                for n in items.iter_mut().filter(|n| n.user_id == user) {
                    n.read = true;
                }
            })?;

        self.changed();
        Ok(())
    }

    pub async fn delete_notification(&self, id: Uuid) -> Result<()> {
        if let Some(api) = self.api() {
            if let Err(e) = api.delete(&format!("/notifications/{}", id)).await {
                tracing::warn!("notification delete mirror failed: {}", e);
            }
        }

        self.local
            .update(keys::NOTIFICATIONS, |items: &mut Vec<Notification>| {
                items.retain(|n| n.id != id);
            })?;

        self.changed();
        Ok(())
    }

    /// Sends an announcement to every known user: one remote broadcast
    /// call plus a local notification per user so offline views see it.
    pub async fn broadcast(
        &self,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<()> {
        if let Some(api) = self.api() {
            let body = json!({ "title": title, "message": message, "kind": kind });
            api.post("/broadcast", &body).await?;
        }

        let users = self.list_users().await?;
        for user in users {
            self.local.append(
                keys::NOTIFICATIONS,
                Notification::new(user.id, title, message, kind, NotificationCategory::System),
            )?;
        }

        self.changed();
        Ok(())
    }
}
