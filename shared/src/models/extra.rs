//! Extra order model
//!
//! Extras are mid-day top-up orders. Same shape and rules as pedidos
//! (one per seller per date) under the "EX" consecutive prefix.

use super::documento::{DocumentoItem, DocumentoItemCreate};
use serde::{Deserialize, Serialize};

/// Extra order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Extra {
    pub id: i64,
    /// Document consecutive, "EX-NNNNN"
    pub consecutivo: String,
    pub codigo_vendedor: String,
    pub fecha: String,
    pub comentarios: Option<String>,
    pub usado: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Extra list row with its computed document total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ExtraResumen {
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

/// Extra with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraDetalle {
    #[serde(flatten)]
    pub extra: Extra,
    pub items: Vec<DocumentoItem>,
    pub total: f64,
}

/// Create extra payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraCreate {
    pub codigo_vendedor: String,
    pub fecha: String,
    pub comentarios: Option<String>,
    pub items: Vec<DocumentoItemCreate>,
}

/// Update extra payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraUpdate {
    pub fecha: Option<String>,
    pub comentarios: Option<String>,
    pub items: Option<Vec<DocumentoItemCreate>>,
}
