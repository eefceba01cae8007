//! Report API handlers
//!
//! All endpoints take a `desde`/`hasta` date range and return flat rows.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::reporte;
use crate::utils::AppResult;
use shared::models::{DashboardResumen, DiaVendedorRow, MesVendedorRow, ProductoReporteRow};

#[derive(Debug, Deserialize)]
pub struct RangoQuery {
    pub desde: String,
    pub hasta: String,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub fecha: String,
}

/// GET /api/reportes/dashboard
pub async fn dashboard(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResumen>> {
    let resumen = reporte::dashboard(&state.pool, &query.fecha).await?;
    Ok(Json(resumen))
}

/// GET /api/reportes/pedidos-por-producto
pub async fn pedidos_por_producto(
    State(state): State<ServerState>,
    Query(query): Query<RangoQuery>,
) -> AppResult<Json<Vec<ProductoReporteRow>>> {
    let rows = reporte::pedidos_por_producto(&state.pool, &query.desde, &query.hasta).await?;
    Ok(Json(rows))
}

/// GET /api/reportes/pedidos-por-dia
pub async fn pedidos_por_dia(
    State(state): State<ServerState>,
    Query(query): Query<RangoQuery>,
) -> AppResult<Json<Vec<DiaVendedorRow>>> {
    let rows = reporte::pedidos_por_dia(&state.pool, &query.desde, &query.hasta).await?;
    Ok(Json(rows))
}

/// GET /api/reportes/pedidos-por-mes
pub async fn pedidos_por_mes(
    State(state): State<ServerState>,
    Query(query): Query<RangoQuery>,
) -> AppResult<Json<Vec<MesVendedorRow>>> {
    let rows = reporte::pedidos_por_mes(&state.pool, &query.desde, &query.hasta).await?;
    Ok(Json(rows))
}

/// GET /api/reportes/extras-por-producto
pub async fn extras_por_producto(
    State(state): State<ServerState>,
    Query(query): Query<RangoQuery>,
) -> AppResult<Json<Vec<ProductoReporteRow>>> {
    let rows = reporte::extras_por_producto(&state.pool, &query.desde, &query.hasta).await?;
    Ok(Json(rows))
}

/// GET /api/reportes/devoluciones-por-producto
pub async fn devoluciones_por_producto(
    State(state): State<ServerState>,
    Query(query): Query<RangoQuery>,
) -> AppResult<Json<Vec<ProductoReporteRow>>> {
    let rows = reporte::devoluciones_por_producto(&state.pool, &query.desde, &query.hasta).await?;
    Ok(Json(rows))
}

/// GET /api/reportes/ventas-por-producto
pub async fn ventas_por_producto(
    State(state): State<ServerState>,
    Query(query): Query<RangoQuery>,
) -> AppResult<Json<Vec<ProductoReporteRow>>> {
    let rows = reporte::ventas_por_producto(&state.pool, &query.desde, &query.hasta).await?;
    Ok(Json(rows))
}
