use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use sqlx::SqlitePool;

use shared::message::{BusMessage, SyncPayload};

use crate::core::Config;
use crate::db::DbService;
use crate::services::MessageBusService;
use crate::utils::AppError;

/// Per-resource version counters
///
/// Lock-free via DashMap. Each resource type keeps its own monotonically
/// increasing version, used by `broadcast_sync` so clients can tell stale
/// data from fresh and detect missed updates.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the version for a resource and return the new value;
    /// unknown resources start at 0 (first increment returns 1).
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version for a resource, 0 when never touched
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// Shared server state
///
/// Holds the configuration, the database pool and the message bus. Clone
/// is cheap: everything inside is either `Copy`, pooled or behind `Arc`.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// In-process message bus for sync push
    pub message_bus: MessageBusService,
    /// Per-resource version counters for broadcast_sync
    pub resource_versions: Arc<ResourceVersions>,
    /// Server start time, for the health endpoint
    pub started_at: Instant,
}

impl ServerState {
    /// Open the database (running migrations) and wire up the bus.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path()).await?;
        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// Build state around an existing pool; used by tests with an
    /// in-memory database.
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self {
            message_bus: MessageBusService::new(config.sync_channel_capacity),
            config,
            pool,
            resource_versions: Arc::new(ResourceVersions::new()),
            started_at: Instant::now(),
        }
    }

    pub fn message_bus(&self) -> &MessageBusService {
        &self.message_bus
    }

    /// Seconds since the server started
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Broadcast a resource change to all connected clients.
    ///
    /// Assigns the next version for the resource and publishes a sync
    /// message on the bus. Failures are logged, never propagated: a dead
    /// push channel must not fail the mutation that triggered it.
    pub async fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        match BusMessage::sync(&payload) {
            Ok(msg) => self.message_bus.publish(msg),
            Err(e) => tracing::warn!("Failed to encode sync payload: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("pedidos"), 0);
        assert_eq!(versions.increment("pedidos"), 1);
        assert_eq!(versions.increment("pedidos"), 2);
        assert_eq!(versions.increment("ventas"), 1);
        assert_eq!(versions.get("pedidos"), 2);
    }
}
