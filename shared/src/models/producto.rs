//! Product model

use serde::{Deserialize, Serialize};

/// Product categories; the category decides which seller commission
/// percentage applies.
pub const CATEGORIA_PANADERIA: &str = "panaderia";
pub const CATEGORIA_BIZCOCHERIA: &str = "bizcocheria";

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Producto {
    pub id: i64,
    /// Unique product code referenced by document lines
    pub codigo: String,
    pub nombre: String,
    pub precio: f64,
    /// "panaderia" or "bizcocheria"
    pub categoria: String,
    pub activo: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductoCreate {
    pub codigo: String,
    pub nombre: String,
    pub precio: f64,
    pub categoria: String,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductoUpdate {
    pub nombre: Option<String>,
    pub precio: Option<f64>,
    pub categoria: Option<String>,
    pub activo: Option<bool>,
}
