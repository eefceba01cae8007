//! Dispatch slip API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{clamp_paging, despacho};
use crate::utils::{AppError, AppResult};
use shared::models::{Despacho, DespachoCreate, DespachoDetalle, DespachoPrefill, DespachoUpdate, Page};

const RESOURCE: &str = "despachos";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<String>,
    pub vendedor_cod: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PrefillQuery {
    pub codigo_origen: String,
    pub tipo_origen: String,
}

/// GET /api/despachos
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Despacho>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = despacho::list(
        &state.pool,
        query.fecha.as_deref(),
        query.vendedor_cod.as_deref(),
        page,
        per_page,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/despachos/prefill?codigo_origen=PD-00001&tipo_origen=pedido
///
/// Ordered lines of the origin document, so the warehouse screen starts
/// from what was requested.
pub async fn prefill(
    State(state): State<ServerState>,
    Query(query): Query<PrefillQuery>,
) -> AppResult<Json<DespachoPrefill>> {
    let prefill = despacho::prefill(&state.pool, &query.codigo_origen, &query.tipo_origen).await?;
    Ok(Json(prefill))
}

/// GET /api/despachos/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DespachoDetalle>> {
    let detalle = despacho::detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Despacho {id}")))?;
    Ok(Json(detalle))
}

/// POST /api/despachos
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<DespachoCreate>,
) -> AppResult<Json<DespachoDetalle>> {
    let detalle = despacho::create(&state.pool, data).await?;
    state
        .broadcast_sync(
            RESOURCE,
            "created",
            &detalle.despacho.id.to_string(),
            Some(&detalle),
        )
        .await;
    Ok(Json(detalle))
}

/// PUT /api/despachos/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<DespachoUpdate>,
) -> AppResult<Json<DespachoDetalle>> {
    let detalle = despacho::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&detalle))
        .await;
    Ok(Json(detalle))
}

/// DELETE /api/despachos/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !despacho::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Despacho {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
