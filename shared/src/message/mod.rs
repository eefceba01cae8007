//! Message bus types shared between the server and its clients.
//!
//! The server pushes these over the in-process broadcast bus and out
//! through the `/ws/sync` WebSocket so terminals can refresh without
//! polling.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// Message bus event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// System notification for operators
    Notification,
    /// Resource change signal
    Sync,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// Message bus envelope
///
/// The payload is pre-serialized JSON so the bus never needs to know the
/// concrete payload type of every event it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    /// Unique ID for tracing a message through logs
    pub request_id: Uuid,
    pub event_type: EventType,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            payload,
        }
    }

    /// Build a sync signal message
    pub fn sync(payload: &SyncPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::Sync, serde_json::to_vec(payload)?))
    }

    /// Build a notification message
    pub fn notification(payload: &NotificationPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            EventType::Notification,
            serde_json::to_vec(payload)?,
        ))
    }

    /// Decode the payload as the given type
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_message_roundtrips() {
        let payload = SyncPayload {
            resource: "ventas".to_string(),
            version: 7,
            action: "created".to_string(),
            id: "123".to_string(),
            data: None,
        };
        let msg = BusMessage::sync(&payload).unwrap();
        assert_eq!(msg.event_type, EventType::Sync);
        let decoded: SyncPayload = msg.decode().unwrap();
        assert_eq!(decoded, payload);
    }
}
