//! Sync API module
//!
//! | Path | Method | Notes |
//! |------|--------|-------|
//! | /api/sync/status | GET | current resource versions |
//! | /ws/sync | GET | WebSocket upgrade, push only |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/sync/status", get(handler::get_sync_status))
        .route("/ws/sync", get(handler::ws_sync))
}
