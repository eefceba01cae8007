//! Sync API handlers

use axum::{
    Json,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;
use shared::message::{BusMessage, EventType};

/// Resources whose versions clients track
const RESOURCES: &[&str] = &[
    "vendedores",
    "productos",
    "pedidos",
    "extras",
    "devoluciones",
    "despachos",
    "ventas",
    "cambios",
    "liquidaciones",
    "canastas",
];

#[derive(Serialize)]
pub struct SyncStatus {
    versions: HashMap<String, u64>,
}

/// GET /api/sync/status
///
/// Clients call this on reconnect to detect missed updates.
pub async fn get_sync_status(State(state): State<ServerState>) -> Json<SyncStatus> {
    let mut versions = HashMap::new();
    for &resource in RESOURCES {
        versions.insert(resource.to_string(), state.resource_versions.get(resource));
    }
    Json(SyncStatus { versions })
}

/// Wire form of a bus message: the payload is re-inlined as JSON so
/// clients get one self-describing text frame.
#[derive(Serialize)]
struct WsEnvelope {
    request_id: uuid::Uuid,
    event_type: EventType,
    payload: serde_json::Value,
}

impl WsEnvelope {
    fn from_bus(msg: &BusMessage) -> Option<Self> {
        let payload = serde_json::from_slice(&msg.payload).ok()?;
        Some(Self {
            request_id: msg.request_id,
            event_type: msg.event_type,
            payload,
        })
    }
}

/// GET /ws/sync - upgrade to the push channel
pub async fn ws_sync(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forward every bus message to the socket until either side goes away.
/// Client frames are ignored except close.
async fn handle_socket(mut socket: WebSocket, state: ServerState) {
    let mut rx = state.message_bus.subscribe();
    tracing::debug!("Sync client connected");

    loop {
        tokio::select! {
            bus_msg = rx.recv() => {
                match bus_msg {
                    Ok(msg) => {
                        let Some(envelope) = WsEnvelope::from_bus(&msg) else {
                            continue;
                        };
                        let Ok(text) = serde_json::to_string(&envelope) else {
                            continue;
                        };
                        if socket.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Sync client lagged, messages dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            client_msg = socket.recv() => {
                match client_msg {
                    None | Some(Ok(Message::Close(_))) => break,
                    Some(Err(_)) => break,
                    // pings are answered by axum, anything else is ignored
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("Sync client disconnected");
}
