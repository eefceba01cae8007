//! Change adjustment (cambio) model
//!
//! A cambio records petty cash / change handed to a seller during the
//! day; it is discounted from the settlement amount.

use serde::{Deserialize, Serialize};

/// Change adjustment entity; at most one per seller per date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cambio {
    pub id: i64,
    pub fecha: String,
    pub codigo_vendedor: String,
    pub valor_cambio: f64,
    pub comentarios: Option<String>,
    /// Username of whoever registered the adjustment
    pub usuario_creador: String,
    pub created_at: i64,
}

/// Create cambio payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CambioCreate {
    pub fecha: String,
    pub codigo_vendedor: String,
    pub valor_cambio: f64,
    pub comentarios: Option<String>,
    pub usuario_creador: String,
}

/// Update cambio payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CambioUpdate {
    pub fecha: Option<String>,
    pub codigo_vendedor: Option<String>,
    pub valor_cambio: Option<f64>,
    pub comentarios: Option<String>,
}
