//! Report row models
//!
//! Reports are plain JSON rows; rendering to files is the frontend's
//! business.

use serde::{Deserialize, Serialize};

/// One document line in a per-product report: who ordered what, at what
/// gross and net value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductoReporteRow {
    pub fecha: String,
    pub codigo_vendedor: String,
    pub nombre_vendedor: String,
    pub producto_cod: String,
    pub nombre_producto: String,
    pub cantidad: i64,
    pub valor_bruto: f64,
    /// Gross minus the seller's category commission
    pub valor_neto: f64,
}

/// Per-day per-seller totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiaVendedorRow {
    pub fecha: String,
    pub codigo_vendedor: String,
    pub nombre_vendedor: String,
    pub cantidad: i64,
    pub valor: f64,
}

/// Document-count / unit / value totals for one day's pedidos or extras
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DocumentoDiaTotales {
    pub documentos: i64,
    pub unidades: i64,
    pub valor: f64,
}

/// Admin dashboard summary: the month's consolidated sales plus the
/// day's order and extra totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResumen {
    pub fecha: String,
    /// "YYYY-MM" of `fecha`
    pub mes: String,
    pub ventas_mes: f64,
    pub pedidos_dia: DocumentoDiaTotales,
    pub extras_dia: DocumentoDiaTotales,
}

/// Per-month per-seller totals; `mes` is "YYYY-MM"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MesVendedorRow {
    pub mes: String,
    pub codigo_vendedor: String,
    pub nombre_vendedor: String,
    pub cantidad: i64,
    pub valor: f64,
}
