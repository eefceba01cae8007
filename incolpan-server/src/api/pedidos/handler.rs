//! Daily order (pedido) API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{clamp_paging, pedido};
use crate::utils::{AppError, AppResult};
use shared::models::{Page, PedidoCreate, PedidoDetalle, PedidoResumen, PedidoUpdate};

const RESOURCE: &str = "pedidos";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Exact date filter, YYYY-MM-DD
    pub fecha: Option<String>,
    /// Consecutive prefix search
    pub consecutivo: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/pedidos
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<PedidoResumen>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = pedido::list(
        &state.pool,
        query.fecha.as_deref(),
        query.consecutivo.as_deref(),
        page,
        per_page,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/pedidos/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PedidoDetalle>> {
    let detalle = pedido::detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Pedido {id}")))?;
    Ok(Json(detalle))
}

/// POST /api/pedidos
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<PedidoCreate>,
) -> AppResult<Json<PedidoDetalle>> {
    let detalle = pedido::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE, "created", &detalle.pedido.id.to_string(), Some(&detalle))
        .await;
    Ok(Json(detalle))
}

/// PUT /api/pedidos/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<PedidoUpdate>,
) -> AppResult<Json<PedidoDetalle>> {
    let detalle = pedido::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&detalle))
        .await;
    Ok(Json(detalle))
}

/// DELETE /api/pedidos/:id - removes the order and its items
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !pedido::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Pedido {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
