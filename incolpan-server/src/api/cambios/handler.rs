//! Change adjustment (cambio) API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{cambio, clamp_paging};
use crate::utils::{AppError, AppResult};
use shared::models::{Cambio, CambioCreate, CambioUpdate, Page};

const RESOURCE: &str = "cambios";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub codigo_vendedor: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/cambios
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Cambio>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = cambio::list(
        &state.pool,
        query.desde.as_deref(),
        query.hasta.as_deref(),
        query.codigo_vendedor.as_deref(),
        page,
        per_page,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/cambios/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Cambio>> {
    let cambio = cambio::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cambio {id}")))?;
    Ok(Json(cambio))
}

/// POST /api/cambios
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<CambioCreate>,
) -> AppResult<Json<Cambio>> {
    let cambio = cambio::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE, "created", &cambio.id.to_string(), Some(&cambio))
        .await;
    Ok(Json(cambio))
}

/// PUT /api/cambios/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<CambioUpdate>,
) -> AppResult<Json<Cambio>> {
    let cambio = cambio::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&cambio))
        .await;
    Ok(Json(cambio))
}

/// DELETE /api/cambios/:id
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !cambio::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Cambio {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
