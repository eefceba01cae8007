//! Consolidated daily sale (venta) model
//!
//! A venta nets up to four source documents for one seller and date:
//! the previous day's return, the day's pedido and extra (both measured
//! by their dispatch's shipped quantities), and the day's return.

use serde::{Deserialize, Serialize};

/// Consolidated sale entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Venta {
    pub id: i64,
    /// Document consecutive, "VT-NNNNN"
    pub consecutivo: String,
    pub codigo_vendedor: String,
    pub fecha: String,
    /// Consecutive of the previous-day devolucion, if any
    pub codigo_dev_anterior: Option<String>,
    pub codigo_pedido: Option<String>,
    pub codigo_extra: Option<String>,
    /// Consecutive of the same-day devolucion, if any
    pub codigo_dev_dia: Option<String>,
    /// Quantity totals per source column
    pub devolucion_anterior: i32,
    pub pedido: i32,
    pub extras: i32,
    pub devolucion_dia: i32,
    /// Sum of line valores
    pub total_venta: f64,
    /// Sum of line commissions
    pub comision: f64,
    /// `total_venta - comision`
    pub pagar_pan: f64,
    /// True once a liquidacion settles this venta
    pub liquidada: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Netted sale line for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VentaItem {
    pub id: i64,
    pub venta_id: i64,
    pub producto_cod: String,
    /// Net quantity: `dev_ant + pedido + extra - dev_dia` (may be negative)
    pub cantidad: i32,
    pub precio_unit: f64,
    /// `precio_unit * cantidad`
    pub subtotal: f64,
    pub comision: f64,
    pub pagar_pan: f64,
}

/// Venta with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentaDetalle {
    #[serde(flatten)]
    pub venta: Venta,
    pub items: Vec<VentaItem>,
}

/// Consolidation request: the seller, date and up to four source
/// document consecutives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentaRequest {
    pub fecha: String,
    pub codigo_vendedor: String,
    pub codigo_dev_anterior: Option<String>,
    pub codigo_pedido: Option<String>,
    pub codigo_extra: Option<String>,
    pub codigo_dev_dia: Option<String>,
}

/// One product's breakdown across the four sources (preview view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentaLinea {
    pub producto_cod: String,
    pub nombre: String,
    pub dev_anterior: i32,
    pub pedido: i32,
    pub extra: i32,
    pub dev_dia: i32,
    /// `dev_anterior + pedido + extra - dev_dia`
    pub total: i32,
    pub precio_unit: f64,
    pub valor: f64,
    pub comision: f64,
    pub pagar_pan: f64,
}

/// Consolidation preview: the computed breakdown before anything is
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentaPreview {
    pub fecha: String,
    pub codigo_vendedor: String,
    pub devolucion_anterior: i32,
    pub pedido: i32,
    pub extras: i32,
    pub devolucion_dia: i32,
    pub total_venta: f64,
    pub comision: f64,
    pub pagar_pan: f64,
    pub lineas: Vec<VentaLinea>,
}
