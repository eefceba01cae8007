//! Shared helpers for the daily document repositories
//!
//! Pedidos, extras and devoluciones capture catalog prices at write
//! time; this module owns that lookup so all three price lines the same
//! way.

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::DocumentoItemCreate;
use sqlx::SqlitePool;

/// A document line with its captured price
#[derive(Debug, Clone)]
pub(crate) struct PricedLine {
    pub producto_cod: String,
    pub cantidad: i32,
    pub precio_unit: f64,
    pub subtotal: f64,
}

/// Price the payload lines against the current catalog.
///
/// Rejects empty payloads and unknown product codes.
pub(crate) async fn price_lines(
    pool: &SqlitePool,
    items: &[DocumentoItemCreate],
) -> RepoResult<Vec<PricedLine>> {
    if items.is_empty() {
        return Err(RepoError::rule(ErrorCode::EmptyDocument));
    }
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let precio: Option<f64> =
            sqlx::query_scalar("SELECT precio FROM productos WHERE codigo = ?")
                .bind(&item.producto_cod)
                .fetch_optional(pool)
                .await?;
        let precio = precio.ok_or_else(|| {
            RepoError::Rule(
                ErrorCode::ProductNotFound,
                format!("Unknown product code {}", item.producto_cod),
            )
        })?;
        lines.push(PricedLine {
            producto_cod: item.producto_cod.clone(),
            cantidad: item.cantidad,
            precio_unit: precio,
            subtotal: precio * item.cantidad as f64,
        });
    }
    Ok(lines)
}

/// Validate a YYYY-MM-DD business date
pub(crate) fn check_fecha(fecha: &str) -> RepoResult<()> {
    shared::util::parse_date(fecha)
        .map(|_| ())
        .ok_or_else(|| RepoError::Rule(ErrorCode::InvalidDate, format!("Invalid date: {fecha}")))
}
