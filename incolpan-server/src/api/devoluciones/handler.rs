//! Return (devolucion) API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{clamp_paging, devolucion};
use crate::utils::{AppError, AppResult};
use shared::models::{
    DevolucionCreate, DevolucionDetalle, DevolucionResumen, DevolucionUpdate, Page,
};

const RESOURCE: &str = "devoluciones";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<String>,
    pub consecutivo: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/devoluciones
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<DevolucionResumen>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = devolucion::list(
        &state.pool,
        query.fecha.as_deref(),
        query.consecutivo.as_deref(),
        page,
        per_page,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/devoluciones/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DevolucionDetalle>> {
    let detalle = devolucion::detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Devolucion {id}")))?;
    Ok(Json(detalle))
}

/// POST /api/devoluciones
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<DevolucionCreate>,
) -> AppResult<Json<DevolucionDetalle>> {
    let detalle = devolucion::create(&state.pool, data).await?;
    state
        .broadcast_sync(
            RESOURCE,
            "created",
            &detalle.devolucion.id.to_string(),
            Some(&detalle),
        )
        .await;
    Ok(Json(detalle))
}

/// PUT /api/devoluciones/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<DevolucionUpdate>,
) -> AppResult<Json<DevolucionDetalle>> {
    let detalle = devolucion::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&detalle))
        .await;
    Ok(Json(detalle))
}

/// DELETE /api/devoluciones/:id - rejected while the return backs a venta
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !devolucion::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Devolucion {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
