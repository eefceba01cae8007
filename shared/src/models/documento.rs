//! Shared line-item types for the daily documents
//!
//! Pedidos, extras and devoluciones all carry the same line shape: a
//! product code, a quantity, and the unit price captured from the catalog
//! when the document was created. Each document table has its own item
//! table but they share the `doc_id` column name, so one row type covers
//! all three.

use serde::{Deserialize, Serialize};

/// A priced line of a pedido, extra or devolucion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DocumentoItem {
    pub id: i64,
    /// Owning document ID
    pub doc_id: i64,
    pub producto_cod: String,
    pub cantidad: i32,
    /// Catalog price at document creation time
    pub precio_unit: f64,
    /// `precio_unit * cantidad`
    pub subtotal: f64,
}

/// Line payload when creating or replacing document items; prices are
/// looked up server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentoItemCreate {
    pub producto_cod: String,
    pub cantidad: i32,
}
