//! Dispatch slip (despacho) model
//!
//! A despacho records what actually left the warehouse against a pedido
//! or extra: ordered vs shipped quantity per line, plus an optional lot
//! code. Consolidation reads shipped quantities from here, not from the
//! origin document.

use serde::{Deserialize, Serialize};

/// Origin document kinds a despacho can cover
pub const ORIGEN_PEDIDO: &str = "pedido";
pub const ORIGEN_EXTRA: &str = "extra";

/// Dispatch slip entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Despacho {
    pub id: i64,
    pub fecha: String,
    pub vendedor_cod: String,
    /// Consecutive of the origin pedido/extra; one despacho per origin
    pub codigo_origen: String,
    /// "pedido" or "extra"
    pub tipo_origen: String,
    pub despachado: bool,
    pub comentarios: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Dispatch line: ordered vs shipped quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DespachoItem {
    pub id: i64,
    pub despacho_id: i64,
    pub producto_cod: String,
    /// Quantity on the origin document
    pub cantidad_pedida: i32,
    /// Quantity actually shipped
    pub cantidad: i32,
    pub lote: Option<String>,
    pub precio_unitario: f64,
    /// `precio_unitario * cantidad` (shipped quantity)
    pub subtotal: f64,
}

/// Despacho with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DespachoDetalle {
    #[serde(flatten)]
    pub despacho: Despacho,
    pub items: Vec<DespachoItem>,
    pub total: f64,
}

/// Create despacho payload; seller and date come from the origin document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DespachoCreate {
    pub codigo_origen: String,
    /// "pedido" or "extra"
    pub tipo_origen: String,
    pub comentarios: Option<String>,
    pub items: Vec<DespachoItemCreate>,
}

/// Dispatch line payload; unit prices are looked up server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DespachoItemCreate {
    pub producto_cod: String,
    pub cantidad_pedida: i32,
    pub cantidad: i32,
    pub lote: Option<String>,
}

/// Update despacho payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DespachoUpdate {
    pub comentarios: Option<String>,
    pub items: Option<Vec<DespachoItemCreate>>,
}

/// Prefill line for the dispatch form: the origin's ordered quantities
/// with current catalog prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DespachoPrefillLinea {
    pub producto_cod: String,
    pub nombre: String,
    pub cantidad_pedida: i32,
    pub precio_unitario: f64,
}

/// Prefill response for a despacho create form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DespachoPrefill {
    pub codigo_origen: String,
    pub tipo_origen: String,
    pub vendedor_cod: String,
    pub fecha: String,
    pub items: Vec<DespachoPrefillLinea>,
}
