//! Crate (canasta) and movement ledger models
//!
//! Bread crates are loaned to sellers and must come back. The ledger is
//! append-only; a crate's `actualidad` is derived from its most recent
//! movement (salida -> prestada, entrada -> disponible).

use serde::{Deserialize, Serialize};

/// Crate availability states
pub const ACTUALIDAD_DISPONIBLE: &str = "disponible";
pub const ACTUALIDAD_PRESTADA: &str = "prestada";
pub const ACTUALIDAD_NO_DISPONIBLE: &str = "no_disponible";

/// Movement kinds
pub const MOVIMIENTO_SALIDA: &str = "salida";
pub const MOVIMIENTO_ENTRADA: &str = "entrada";

/// Crate entity, keyed by its barcode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Canasta {
    pub codigo_barras: String,
    pub tamano: String,
    pub color: String,
    pub estado: String,
    /// Registration timestamp, UTC milliseconds
    pub fecha_registro: i64,
    /// "disponible", "prestada" or "no_disponible"
    pub actualidad: String,
}

/// Register crate payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanastaCreate {
    pub codigo_barras: String,
    pub tamano: String,
    pub color: String,
    pub estado: String,
}

/// One ledger entry: a crate leaving with or returning from a seller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MovimientoCanasta {
    pub id: i64,
    pub codigo_vendedor: String,
    /// "salida" or "entrada"
    pub tipo_movimiento: String,
    pub codigo_barras: String,
    /// Movement timestamp, UTC milliseconds
    pub fecha_movimiento: i64,
}

/// Record movement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovimientoCreate {
    pub codigo_vendedor: String,
    pub tipo_movimiento: String,
    pub codigo_barras: String,
}

/// Crate with its recent ledger entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanastaDetalle {
    #[serde(flatten)]
    pub canasta: Canasta,
    pub movimientos: Vec<MovimientoCanasta>,
}

/// Inventory report row, grouped by size and color
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventarioCanastas {
    pub tamano: String,
    pub color: String,
    pub disponibles: i64,
    pub prestadas: i64,
    pub total: i64,
}

/// Per-seller loan/return counts for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CanastasVendedorDia {
    pub codigo_vendedor: String,
    pub salidas: i64,
    pub entradas: i64,
}

/// Count of crates currently loaned to one seller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PrestadasResumen {
    pub codigo_vendedor: String,
    pub cantidad: i64,
}

/// A crate currently loaned out: its last salida
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PrestadaDetalle {
    pub codigo_barras: String,
    pub tamano: String,
    pub color: String,
    /// Timestamp of the salida, UTC milliseconds
    pub fecha_salida: i64,
}

/// A crate loaned out longer than the allowed window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CanastaVencida {
    pub codigo_barras: String,
    pub codigo_vendedor: String,
    pub fecha_salida: i64,
    pub dias_fuera: i64,
}
