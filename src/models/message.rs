//! Chat message models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message, from the local user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    Me,
    Them,
}

/// Delivery status. Ordered: a message only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
}

impl DeliveryStatus {
    /// Tick marks shown next to a message.
    pub fn ticks(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "✓",
            DeliveryStatus::Delivered | DeliveryStatus::Read => "✓✓",
        }
    }
}

/// Message payload kind. Only text is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Text,
    Image,
    File,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub status: DeliveryStatus,
    pub kind: MessageKind,
}

impl Message {
    pub fn text(
        id: impl Into<String>,
        text: impl Into<String>,
        sender: Sender,
        status: DeliveryStatus,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            status,
            kind: MessageKind::Text,
        }
    }

    /// Move the status forward. Returns false (and leaves the message alone)
    /// if `next` is not strictly ahead of the current status.
    pub fn advance(&mut self, next: DeliveryStatus) -> bool {
        if next > self.status {
            self.status = next;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_only_moves_forward() {
        let mut msg = Message::text("1", "Oi", Sender::Me, DeliveryStatus::Sent);

        assert!(msg.advance(DeliveryStatus::Delivered));
        assert!(msg.advance(DeliveryStatus::Read));
        assert!(!msg.advance(DeliveryStatus::Delivered));
        assert!(!msg.advance(DeliveryStatus::Read));
        assert_eq!(msg.status, DeliveryStatus::Read);
    }

    #[test]
    fn test_ticks() {
        assert_eq!(DeliveryStatus::Sent.ticks(), "✓");
        assert_eq!(DeliveryStatus::Delivered.ticks(), "✓✓");
        assert_eq!(DeliveryStatus::Read.ticks(), "✓✓");
    }
}
