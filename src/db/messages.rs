//! Direct messages.
//!
//! Sends go to the remote API when it is reachable and fall back to the
//! local store when it is not — a message typed while offline is kept, not
//! lost. Read receipts are a local, monotonic progression.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{DeliveryStatus, Message};
use crate::store::keys;

use super::Database;

impl Database {
    pub async fn send_message(&self, message: Message) -> Result<()> {
        if message.text.trim().is_empty() {
            return Err(Error::Validation("message text is required".into()));
        }

        if let Some(api) = self.api() {
            if let Err(e) = api.post("/messages", &message).await {
                tracing::warn!("message send failed, keeping local copy: {}", e);
            }
        }

        self.local.append(keys::MESSAGES, message)?;
        self.changed();
        Ok(())
    }

    /// The conversation between two users, oldest first. Remote when
    /// available, otherwise the local copy filtered in both directions.
    pub async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        let mut messages = match self.api() {
            Some(api) => {
                let path = format!("/messages?senderId={}&receiverId={}", a, b);
                match api.get::<Vec<Message>>(&path).await {
                    Ok(items) => items,
                    Err(e) => {
                        tracing::warn!("message fetch failed, using local fallback: {}", e);
                        conversation_slice(self.local.get(keys::MESSAGES), a, b)
                    }
                }
            }
            None => conversation_slice(self.local.get(keys::MESSAGES), a, b),
        };

        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Marks every message from `contact` to `viewer` as read. Already-read
    /// messages are untouched; the status never moves backwards.
    pub fn mark_messages_read(&self, viewer: Uuid, contact: Uuid) -> Result<()> {
        let mut updated = false;
        self.local.update(keys::MESSAGES, |messages: &mut Vec<Message>| {
            for message in messages.iter_mut() {
                if message.receiver_id == viewer
                    && message.sender_id == contact
                    && message.status != DeliveryStatus::Read
                {
                    message.advance_status(DeliveryStatus::Read);
                    updated = true;
                }
            }
        })?;

        if updated {
            self.changed();
        }
        Ok(())
    }
}

fn conversation_slice(messages: Vec<Message>, a: Uuid, b: Uuid) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|m| {
            (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
        })
        .collect()
}
