//! Return (devolucion) model

use super::documento::{DocumentoItem, DocumentoItemCreate};
use serde::{Deserialize, Serialize};

/// Maximum number of consolidations a devolucion can feed: once as the
/// same-day return and once as the previous-day return.
pub const MAX_USOS_DEVOLUCION: i32 = 2;

/// Maximum devoluciones a seller may register per business date.
pub const MAX_DEVOLUCIONES_POR_DIA: i64 = 2;

/// Return entity
///
/// A seller may register up to two devoluciones per date. `usos` counts
/// how many consolidated sales reference it (cap 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Devolucion {
    pub id: i64,
    /// Document consecutive, "DV-NNNNN"
    pub consecutivo: String,
    pub codigo_vendedor: String,
    pub fecha: String,
    pub comentarios: Option<String>,
    pub usos: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Devolucion list row with its computed document total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DevolucionResumen {
    pub id: i64,
    pub consecutivo: String,
    pub codigo_vendedor: String,
    pub fecha: String,
    pub comentarios: Option<String>,
    pub usos: i32,
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Devolucion with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevolucionDetalle {
    #[serde(flatten)]
    pub devolucion: Devolucion,
    pub items: Vec<DocumentoItem>,
    pub total: f64,
}

/// Create devolucion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevolucionCreate {
    pub codigo_vendedor: String,
    pub fecha: String,
    pub comentarios: Option<String>,
    pub items: Vec<DocumentoItemCreate>,
}

/// Update devolucion payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevolucionUpdate {
    pub fecha: Option<String>,
    pub comentarios: Option<String>,
    pub items: Option<Vec<DocumentoItemCreate>>,
}
