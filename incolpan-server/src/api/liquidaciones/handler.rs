//! Settlement (liquidacion) API handlers
//!
//! A settlement closes the pending venta of one seller and date:
//! `valor_a_pagar = (total_venta - comision) - same-day cambio`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{clamp_paging, liquidacion};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Liquidacion, LiquidacionCreate, LiquidacionPreview, LiquidacionResumen, LiquidacionUpdate,
    Page,
};

const RESOURCE: &str = "liquidaciones";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub codigo_vendedor: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub codigo_vendedor: String,
    pub fecha: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumenQuery {
    pub desde: String,
    pub hasta: String,
}

/// GET /api/liquidaciones
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Liquidacion>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = liquidacion::list(
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

/// GET /api/liquidaciones/preview?codigo_vendedor=V01&fecha=2025-03-10
pub async fn preview(
    State(state): State<ServerState>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<LiquidacionPreview>> {
    let preview = liquidacion::preview(&state.pool, &query.codigo_vendedor, &query.fecha).await?;
    Ok(Json(preview))
}

/// GET /api/liquidaciones/resumen?desde=...&hasta=...
pub async fn resumen(
    State(state): State<ServerState>,
    Query(query): Query<ResumenQuery>,
) -> AppResult<Json<LiquidacionResumen>> {
    let resumen = liquidacion::resumen(&state.pool, &query.desde, &query.hasta).await?;
    Ok(Json(resumen))
}

/// GET /api/liquidaciones/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Liquidacion>> {
    let liquidacion = liquidacion::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Liquidacion {id}")))?;
    Ok(Json(liquidacion))
}

/// POST /api/liquidaciones
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<LiquidacionCreate>,
) -> AppResult<Json<Liquidacion>> {
    let liquidacion = liquidacion::create(&state.pool, data).await?;
    state
        .broadcast_sync(
            RESOURCE,
            "created",
            &liquidacion.id.to_string(),
            Some(&liquidacion),
        )
        .await;
    Ok(Json(liquidacion))
}

/// PUT /api/liquidaciones/:id - adjust the payment split
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<LiquidacionUpdate>,
) -> AppResult<Json<Liquidacion>> {
    let liquidacion = liquidacion::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&liquidacion))
        .await;
    Ok(Json(liquidacion))
}

/// DELETE /api/liquidaciones/:id - reopens the venta
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !liquidacion::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Liquidacion {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
