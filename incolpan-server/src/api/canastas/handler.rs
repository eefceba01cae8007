//! Crate (canasta) ledger API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{canasta, clamp_paging};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Canasta, CanastaCreate, CanastaDetalle, CanastaVencida, CanastasVendedorDia,
    InventarioCanastas, MovimientoCanasta, MovimientoCreate, Page, PrestadaDetalle,
    PrestadasResumen,
};

const RESOURCE: &str = "canastas";

/// Millisecond range [start, end) of one calendar day, UTC
fn day_bounds(fecha: &str) -> Result<(i64, i64), AppError> {
    let date = shared::util::parse_date(fecha).ok_or_else(|| AppError::invalid_date(fecha))?;
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::invalid_date(fecha))?
        .and_utc()
        .timestamp_millis();
    Ok((start, start + 86_400_000))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct FechaQuery {
    pub fecha: String,
}

#[derive(Debug, Deserialize)]
pub struct RangoQuery {
    pub desde: String,
    pub hasta: String,
}

/// GET /api/canastas
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Canasta>>> {
    let (page, per_page) = clamp_paging(query.page, query.per_page);
    let result = canasta::list(&state.pool, page, per_page).await?;
    Ok(Json(result))
}

/// POST /api/canastas - register a crate
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<CanastaCreate>,
) -> AppResult<Json<Canasta>> {
    let canasta = canasta::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE, "created", &canasta.codigo_barras, Some(&canasta))
        .await;
    Ok(Json(canasta))
}

/// GET /api/canastas/:codigo_barras - crate with recent movements
pub async fn get_by_codigo(
    State(state): State<ServerState>,
    Path(codigo_barras): Path<String>,
) -> AppResult<Json<CanastaDetalle>> {
    let detalle = canasta::detail(&state.pool, &codigo_barras)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Canasta {codigo_barras}")))?;
    Ok(Json(detalle))
}

/// POST /api/canastas/movimientos - append a salida/entrada
pub async fn record_movement(
    State(state): State<ServerState>,
    Json(data): Json<MovimientoCreate>,
) -> AppResult<Json<MovimientoCanasta>> {
    let movimiento = canasta::record_movement(&state.pool, data).await?;
    state
        .broadcast_sync(
            RESOURCE,
            "updated",
            &movimiento.codigo_barras,
            Some(&movimiento),
        )
        .await;
    Ok(Json(movimiento))
}

/// GET /api/canastas/movimientos - most recent movements
pub async fn recent_movements(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<MovimientoCanasta>>> {
    let movimientos = canasta::recent_movements(&state.pool).await?;
    Ok(Json(movimientos))
}

/// GET /api/canastas/movimientos/rango?desde=...&hasta=...
pub async fn movements_between(
    State(state): State<ServerState>,
    Query(query): Query<RangoQuery>,
) -> AppResult<Json<Vec<MovimientoCanasta>>> {
    let (desde, _) = day_bounds(&query.desde)?;
    let (_, hasta) = day_bounds(&query.hasta)?;
    let movimientos = canasta::movements_between(&state.pool, desde, hasta - 1).await?;
    Ok(Json(movimientos))
}

/// GET /api/canastas/inventario
pub async fn inventario(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<InventarioCanastas>>> {
    let inventario = canasta::inventario(&state.pool).await?;
    Ok(Json(inventario))
}

/// GET /api/canastas/por-vendedor-dia?fecha=...
pub async fn por_vendedor_dia(
    State(state): State<ServerState>,
    Query(query): Query<FechaQuery>,
) -> AppResult<Json<Vec<CanastasVendedorDia>>> {
    let (desde, hasta) = day_bounds(&query.fecha)?;
    let resumen = canasta::por_vendedor_dia(&state.pool, desde, hasta).await?;
    Ok(Json(resumen))
}

/// GET /api/canastas/prestadas - loaned crate counts per seller
pub async fn prestadas_resumen(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<PrestadasResumen>>> {
    let resumen = canasta::prestadas_resumen(&state.pool).await?;
    Ok(Json(resumen))
}

/// GET /api/canastas/prestadas/:codigo_vendedor
pub async fn prestadas_de(
    State(state): State<ServerState>,
    Path(codigo_vendedor): Path<String>,
) -> AppResult<Json<Vec<PrestadaDetalle>>> {
    let detalle = canasta::prestadas_de(&state.pool, &codigo_vendedor).await?;
    Ok(Json(detalle))
}

/// GET /api/canastas/vencidas - loans out for more than a week
pub async fn vencidas(State(state): State<ServerState>) -> AppResult<Json<Vec<CanastaVencida>>> {
    let vencidas = canasta::vencidas(&state.pool).await?;
    Ok(Json(vencidas))
}
