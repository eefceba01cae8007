//! Repository module
//!
//! One submodule per aggregate; repositories are free async functions
//! over `&SqlitePool` returning [`RepoResult`]. Anything that mutates
//! more than one row runs inside a transaction.

pub mod cambio;
pub mod canasta;
pub mod despacho;
pub mod devolucion;
pub(crate) mod documento;
pub mod extra;
pub mod liquidacion;
pub mod pedido;
pub mod producto;
pub mod reporte;
pub mod vendedor;
pub mod venta;

use shared::ErrorCode;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A business rule with its own error code (duplicate documents,
    /// exhausted returns, ledger violations, ...)
    #[error("{1}")]
    Rule(ErrorCode, String),
}

impl RepoError {
    /// Shorthand for a rule violation using the code's default message
    pub fn rule(code: ErrorCode) -> Self {
        RepoError::Rule(code, code.message().to_string())
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Page query defaults shared by the list endpoints
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 200;

/// Clamp raw page parameters into something sane
pub fn clamp_paging(page: Option<u32>, per_page: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

/// SQL OFFSET for a 1-based page, widened to i64 so oversized page
/// numbers cannot overflow the multiplication.
pub(crate) fn page_offset(page: u32, per_page: u32) -> i64 {
    (i64::from(page) - 1) * i64::from(per_page)
}

/// Next consecutive "PREFIX-NNNNN" from the current maximum suffix in a
/// table's consecutive column.
pub(crate) async fn next_consecutivo(
    pool: &sqlx::SqlitePool,
    table: &str,
    column: &str,
    prefix: &str,
) -> RepoResult<String> {
    // Strip "PREFIX-" and take the numeric max; non-numeric suffixes are 0
    let sql = format!(
        "SELECT COALESCE(MAX(CAST(SUBSTR({column}, {start}) AS INTEGER)), 0) FROM {table} WHERE {column} LIKE ?",
        start = prefix.len() + 2,
    );
    let max: i64 = sqlx::query_scalar(&sql)
        .bind(format!("{prefix}-%"))
        .fetch_one(pool)
        .await?;
    Ok(format!("{prefix}-{:05}", max + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn consecutivo_starts_at_one_and_increments() {
        let pool = test_pool().await;
        let first = next_consecutivo(&pool, "pedidos", "consecutivo", "PD")
            .await
            .unwrap();
        assert_eq!(first, "PD-00001");

        sqlx::query(
            "INSERT INTO pedidos (id, consecutivo, codigo_vendedor, fecha, usado, created_at, updated_at) VALUES (1, 'PD-00041', 'V01', '2025-01-01', 0, 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let next = next_consecutivo(&pool, "pedidos", "consecutivo", "PD")
            .await
            .unwrap();
        assert_eq!(next, "PD-00042");
    }

    #[test]
    fn paging_clamps() {
        assert_eq!(clamp_paging(None, None), (1, DEFAULT_PER_PAGE));
        assert_eq!(clamp_paging(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_paging(Some(3), Some(10_000)), (3, MAX_PER_PAGE));
    }

    #[test]
    fn page_offset_survives_oversized_pages() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(
            page_offset(u32::MAX, MAX_PER_PAGE),
            (i64::from(u32::MAX) - 1) * i64::from(MAX_PER_PAGE)
        );
    }
}
