use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery progression of a direct message.
///
/// The ordering is meaningful: `Sent < Delivered < Read`, and a message's
/// status only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
}

/// A direct message between two users. Immutable once created except for
/// the delivery status progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub status: DeliveryStatus,
}

impl Message {
    pub fn new(sender_id: Uuid, receiver_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            text: text.into(),
            timestamp: Utc::now(),
            status: DeliveryStatus::Sent,
        }
    }

    /// Advances the delivery status, never regressing it.
    pub fn advance_status(&mut self, status: DeliveryStatus) {
        if status > self.status {
            self.status = status;
        }
    }
}
