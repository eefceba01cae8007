use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Notification payload (server -> clients)
///
/// Shown to operators: end-of-day reminders, dispatch mismatches, etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    /// Extra data (JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl NotificationPayload {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Info,
            data: None,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Warning,
            data: None,
        }
    }
}

/// Sync signal payload (server -> all clients)
///
/// Broadcast whenever a resource changes so connected terminals refresh
/// their local copy instead of polling.
///
/// # Example
/// - `resource`: "pedidos"
/// - `version`: 42
/// - `action`: "created"
/// - `id`: "198234712"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type (e.g. "pedidos", "ventas", "canastas")
    pub resource: String,
    /// Monotonic per-resource version; a gap tells the client to do a
    /// full refresh instead of an incremental one
    pub version: u64,
    /// Change type: "created", "updated" or "deleted"
    pub action: String,
    /// ID of the changed entity
    pub id: String,
    /// Entity data (None for deletions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
