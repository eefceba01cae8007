//! Seller repository

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{Vendedor, VendedorCreate, VendedorUpdate};
use sqlx::SqlitePool;

const VENDEDOR_SELECT: &str = "SELECT id, codigo_vendedor, nombre, rol, comision_panaderia, comision_bizcocheria, is_active, created_at, updated_at FROM vendedores";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Vendedor>> {
    let sql = format!("{VENDEDOR_SELECT} WHERE is_active = 1 ORDER BY nombre");
    let rows = sqlx::query_as::<_, Vendedor>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Vendedor>> {
    let sql = format!("{VENDEDOR_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Vendedor>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_codigo(pool: &SqlitePool, codigo: &str) -> RepoResult<Option<Vendedor>> {
    let sql = format!("{VENDEDOR_SELECT} WHERE codigo_vendedor = ?");
    let row = sqlx::query_as::<_, Vendedor>(&sql)
        .bind(codigo)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: VendedorCreate) -> RepoResult<Vendedor> {
    if data.codigo_vendedor.trim().is_empty() || data.nombre.trim().is_empty() {
        return Err(RepoError::Validation(
            "codigo_vendedor and nombre are required".into(),
        ));
    }
    if find_by_codigo(pool, &data.codigo_vendedor).await?.is_some() {
        return Err(RepoError::rule(ErrorCode::SellerCodeExists));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO vendedores (id, codigo_vendedor, nombre, rol, comision_panaderia, comision_bizcocheria, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.codigo_vendedor)
    .bind(&data.nombre)
    .bind(&data.rol)
    .bind(data.comision_panaderia)
    .bind(data.comision_bizcocheria)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create vendedor".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: VendedorUpdate) -> RepoResult<Vendedor> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE vendedores SET nombre = COALESCE(?, nombre), rol = COALESCE(?, rol), comision_panaderia = COALESCE(?, comision_panaderia), comision_bizcocheria = COALESCE(?, comision_bizcocheria), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.nombre)
    .bind(&data.rol)
    .bind(data.comision_panaderia)
    .bind(data.comision_bizcocheria)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::rule(ErrorCode::SellerNotFound));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::rule(ErrorCode::SellerNotFound))
}

/// Soft delete; the seller's documents remain
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE vendedores SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn sample() -> VendedorCreate {
        VendedorCreate {
            codigo_vendedor: "V01".into(),
            nombre: "Carlos Pérez".into(),
            rol: "vendedor".into(),
            comision_panaderia: 10.0,
            comision_bizcocheria: 12.5,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_by_codigo() {
        let pool = test_pool().await;
        let created = create(&pool, sample()).await.unwrap();
        assert!(created.is_active);

        let fetched = find_by_codigo(&pool, "V01").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.comision_bizcocheria, 12.5);
    }

    #[tokio::test]
    async fn duplicate_codigo_is_rejected() {
        let pool = test_pool().await;
        create(&pool, sample()).await.unwrap();
        let err = create(&pool, sample()).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::SellerCodeExists, _)
        ));
    }

    #[tokio::test]
    async fn soft_delete_hides_from_listing() {
        let pool = test_pool().await;
        let created = create(&pool, sample()).await.unwrap();
        assert!(delete(&pool, created.id).await.unwrap());
        assert!(find_all(&pool).await.unwrap().is_empty());
        // Still reachable by id for historical documents
        assert!(find_by_id(&pool, created.id).await.unwrap().is_some());
    }
}
