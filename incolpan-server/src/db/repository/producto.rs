//! Product repository

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{Producto, ProductoCreate, ProductoUpdate};
use sqlx::SqlitePool;

const PRODUCTO_SELECT: &str =
    "SELECT id, codigo, nombre, precio, categoria, activo, created_at, updated_at FROM productos";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Producto>> {
    let sql = format!("{PRODUCTO_SELECT} WHERE activo = 1 ORDER BY codigo");
    let rows = sqlx::query_as::<_, Producto>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Producto>> {
    let sql = format!("{PRODUCTO_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Producto>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_codigo(pool: &SqlitePool, codigo: &str) -> RepoResult<Option<Producto>> {
    let sql = format!("{PRODUCTO_SELECT} WHERE codigo = ?");
    let row = sqlx::query_as::<_, Producto>(&sql)
        .bind(codigo)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ProductoCreate) -> RepoResult<Producto> {
    if data.codigo.trim().is_empty() || data.nombre.trim().is_empty() {
        return Err(RepoError::Validation("codigo and nombre are required".into()));
    }
    if find_by_codigo(pool, &data.codigo).await?.is_some() {
        return Err(RepoError::rule(ErrorCode::ProductCodeExists));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO productos (id, codigo, nombre, precio, categoria, activo, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.codigo)
    .bind(&data.nombre)
    .bind(data.precio)
    .bind(&data.categoria)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create producto".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductoUpdate) -> RepoResult<Producto> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE productos SET nombre = COALESCE(?, nombre), precio = COALESCE(?, precio), categoria = COALESCE(?, categoria), activo = COALESCE(?, activo), updated_at = ? WHERE id = ?",
    )
    .bind(&data.nombre)
    .bind(data.precio)
    .bind(&data.categoria)
    .bind(data.activo)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::rule(ErrorCode::ProductNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::rule(ErrorCode::ProductNotFound))
}

/// Soft delete; historical document lines keep their captured prices
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE productos SET activo = 0, updated_at = ? WHERE id = ? AND activo = 1")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}
