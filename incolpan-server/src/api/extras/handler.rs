//! Extra order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{clamp_paging, extra};
use crate::utils::{AppError, AppResult};
use shared::models::{ExtraCreate, ExtraDetalle, ExtraResumen, ExtraUpdate, Page};

const RESOURCE: &str = "extras";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<String>,
    pub consecutivo: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/extras
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<ExtraResumen>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = extra::list(
        &state.pool,
        query.fecha.as_deref(),
        query.consecutivo.as_deref(),
        page,
        per_page,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/extras/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ExtraDetalle>> {
    let detalle = extra::detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Extra {id}")))?;
    Ok(Json(detalle))
}

/// POST /api/extras
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ExtraCreate>,
) -> AppResult<Json<ExtraDetalle>> {
    let detalle = extra::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE, "created", &detalle.extra.id.to_string(), Some(&detalle))
        .await;
    Ok(Json(detalle))
}

/// PUT /api/extras/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<ExtraUpdate>,
) -> AppResult<Json<ExtraDetalle>> {
    let detalle = extra::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&detalle))
        .await;
    Ok(Json(detalle))
}

/// DELETE /api/extras/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !extra::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Extra {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
