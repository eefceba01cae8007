//! Seller model

use serde::{Deserialize, Serialize};

/// Seller roles understood by the platform
pub const ROL_VENDEDOR: &str = "vendedor";
pub const ROL_SEMIADMIN: &str = "semiadmin";
pub const ROL_ADMINISTRADOR: &str = "administrador";

/// Seller entity
///
/// Commission percentages are stored as 0-100 values and applied per
/// product category when a daily sale is consolidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Vendedor {
    pub id: i64,
    /// Unique seller code used on every document
    pub codigo_vendedor: String,
    pub nombre: String,
    /// "vendedor", "semiadmin" or "administrador"
    pub rol: String,
    /// Commission percentage on bread products (0-100)
    pub comision_panaderia: f64,
    /// Commission percentage on pastry products (0-100)
    pub comision_bizcocheria: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create seller payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendedorCreate {
    pub codigo_vendedor: String,
    pub nombre: String,
    pub rol: String,
    pub comision_panaderia: f64,
    pub comision_bizcocheria: f64,
}

/// Update seller payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendedorUpdate {
    pub nombre: Option<String>,
    pub rol: Option<String>,
    pub comision_panaderia: Option<f64>,
    pub comision_bizcocheria: Option<f64>,
    pub is_active: Option<bool>,
}

impl Vendedor {
    /// Commission percentage for a product category; unknown categories
    /// earn no commission.
    pub fn comision_para(&self, categoria: &str) -> f64 {
        match categoria {
            crate::models::producto::CATEGORIA_PANADERIA => self.comision_panaderia,
            crate::models::producto::CATEGORIA_BIZCOCHERIA => self.comision_bizcocheria,
            _ => 0.0,
        }
    }
}
