//! Settlement (liquidacion) model
//!
//! A liquidacion settles a consolidated sale: the seller hands over
//! `(total_venta - comision) - same-day cambio`, split across bank,
//! cash and other payment methods.

use super::venta::Venta;
use serde::{Deserialize, Serialize};

/// Settlement entity; at most one per seller per date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Liquidacion {
    pub id: i64,
    /// Document consecutive, "LQ-NNNNN"
    pub codigo: String,
    pub fecha: String,
    pub codigo_vendedor: String,
    pub venta_id: i64,
    /// Snapshot of the venta's total at settlement time
    pub valor_venta: f64,
    pub valor_comision: f64,
    /// Same-day cambio amount discounted from the payable
    pub descuento_cambios: f64,
    /// `(valor_venta - valor_comision) - descuento_cambios`
    pub valor_a_pagar: f64,
    pub pago_banco: f64,
    pub pago_efectivo: f64,
    pub pago_otros: f64,
    pub comentarios: Option<String>,
    pub usuario_creador: String,
    pub created_at: i64,
    pub usuario_modificador: Option<String>,
    pub updated_at: i64,
}

/// Create liquidacion payload; the derived amounts are computed
/// server-side from the pending venta and the same-day cambio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidacionCreate {
    pub fecha: String,
    pub codigo_vendedor: String,
    pub pago_banco: f64,
    pub pago_efectivo: f64,
    pub pago_otros: f64,
    pub comentarios: Option<String>,
    pub usuario_creador: String,
}

/// Update liquidacion payload: payment split and comments only; derived
/// amounts are recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidacionUpdate {
    pub pago_banco: Option<f64>,
    pub pago_efectivo: Option<f64>,
    pub pago_otros: Option<f64>,
    pub comentarios: Option<String>,
    pub usuario_modificador: String,
}

/// Settlement preview: the pending venta plus what would be payable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidacionPreview {
    pub venta: Venta,
    pub descuento_cambios: f64,
    pub valor_a_pagar: f64,
}

/// Per-seller totals for the settlement summary report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LiquidacionVendedorResumen {
    pub codigo_vendedor: String,
    pub nombre_vendedor: String,
    pub total_ventas: f64,
    /// `valor_venta - valor_comision` aggregated
    pub total_pagar_pan: f64,
    pub total_pagado: f64,
}

/// Payment-method totals for the settlement summary report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PagoTotales {
    pub banco: f64,
    pub efectivo: f64,
    pub otros: f64,
}

/// Settlement summary over a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidacionResumen {
    pub desde: String,
    pub hasta: String,
    pub por_vendedor: Vec<LiquidacionVendedorResumen>,
    pub pagos: PagoTotales,
}
