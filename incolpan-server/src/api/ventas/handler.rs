//! Consolidated sale (venta) API handlers
//!
//! A venta consolidates up to four source documents for one seller and
//! date. Preview computes the per-product breakdown without touching
//! anything; create persists it and marks the sources used.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{clamp_paging, venta};
use crate::utils::{AppError, AppResult};
use shared::models::{Page, Venta, VentaDetalle, VentaPreview, VentaRequest};

const RESOURCE: &str = "ventas";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<String>,
    pub consecutivo: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/ventas
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Venta>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = venta::list(
        &state.pool,
        query.fecha.as_deref(),
        query.consecutivo.as_deref(),
        page,
        per_page,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/ventas/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<VentaDetalle>> {
    let detalle = venta::detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Venta {id}")))?;
    Ok(Json(detalle))
}

/// POST /api/ventas/preview - breakdown without persisting
pub async fn preview(
    State(state): State<ServerState>,
    Json(req): Json<VentaRequest>,
) -> AppResult<Json<VentaPreview>> {
    let preview = venta::breakdown(&state.pool, &req).await?;
    Ok(Json(preview))
}

/// POST /api/ventas
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<VentaRequest>,
) -> AppResult<Json<VentaDetalle>> {
    let detalle = venta::create(&state.pool, &req).await?;
    state
        .broadcast_sync(RESOURCE, "created", &detalle.venta.id.to_string(), Some(&detalle))
        .await;
    Ok(Json(detalle))
}

/// DELETE /api/ventas/:id - releases the source documents
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !venta::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Venta {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
