//! Daily order (pedido) model

use super::documento::{DocumentoItem, DocumentoItemCreate};
use serde::{Deserialize, Serialize};

/// Daily order entity
///
/// One pedido per seller per business date. `usado` flips to true when a
/// consolidated sale references this document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Pedido {
    pub id: i64,
    /// Document consecutive, "PD-NNNNN"
    pub consecutivo: String,
    pub codigo_vendedor: String,
    /// Business date, YYYY-MM-DD
    pub fecha: String,
    pub comentarios: Option<String>,
    pub usado: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Pedido list row with its computed document total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PedidoResumen {
    pub id: i64,
    pub consecutivo: String,
    pub codigo_vendedor: String,
    pub fecha: String,
    pub comentarios: Option<String>,
    pub usado: bool,
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Pedido with its lines (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedidoDetalle {
    #[serde(flatten)]
    pub pedido: Pedido,
    pub items: Vec<DocumentoItem>,
    pub total: f64,
}

/// Create pedido payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedidoCreate {
    pub codigo_vendedor: String,
    pub fecha: String,
    pub comentarios: Option<String>,
    pub items: Vec<DocumentoItemCreate>,
}

/// Update pedido payload; when `items` is present the lines are replaced
/// and repriced from the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PedidoUpdate {
    pub fecha: Option<String>,
    pub comentarios: Option<String>,
    pub items: Option<Vec<DocumentoItemCreate>>,
}
