//! Change adjustment (cambio) repository

use super::documento::check_fecha;
use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{Cambio, CambioCreate, CambioUpdate, Page};
use sqlx::SqlitePool;

const CAMBIO_SELECT: &str = "SELECT id, fecha, codigo_vendedor, valor_cambio, comentarios, usuario_creador, created_at FROM cambios";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Cambio>> {
    let sql = format!("{CAMBIO_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Cambio>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The cambio for one seller and date; settlement reads this to compute
/// the discount.
pub async fn find_by_vendedor_fecha(
    pool: &SqlitePool,
    codigo_vendedor: &str,
    fecha: &str,
) -> RepoResult<Option<Cambio>> {
    let sql = format!("{CAMBIO_SELECT} WHERE codigo_vendedor = ? AND fecha = ?");
    let row = sqlx::query_as::<_, Cambio>(&sql)
        .bind(codigo_vendedor)
        .bind(fecha)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list(
    pool: &SqlitePool,
    desde: Option<&str>,
    hasta: Option<&str>,
    codigo_vendedor: Option<&str>,
    page: u32,
    per_page: u32,
) -> RepoResult<Page<Cambio>> {
    let mut where_sql = String::from("WHERE 1=1");
    if desde.is_some() {
        where_sql.push_str(" AND fecha >= ?");
    }
    if hasta.is_some() {
        where_sql.push_str(" AND fecha <= ?");
    }
    if codigo_vendedor.is_some() {
        where_sql.push_str(" AND codigo_vendedor = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM cambios {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for v in [desde, hasta, codigo_vendedor].into_iter().flatten() {
        count_query = count_query.bind(v.to_string());
    }
    let total_items = count_query.fetch_one(pool).await?;

    let list_sql = format!("{CAMBIO_SELECT} {where_sql} ORDER BY fecha DESC, id DESC LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query_as::<_, Cambio>(&list_sql);
    for v in [desde, hasta, codigo_vendedor].into_iter().flatten() {
        list_query = list_query.bind(v.to_string());
    }
    let items = list_query
        .bind(per_page as i64)
        .bind(super::page_offset(page, per_page))
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, page, per_page, total_items))
}

pub async fn create(pool: &SqlitePool, data: CambioCreate) -> RepoResult<Cambio> {
    check_fecha(&data.fecha)?;
    if super::vendedor::find_by_codigo(pool, &data.codigo_vendedor)
        .await?
        .is_none()
    {
        return Err(RepoError::rule(ErrorCode::SellerNotFound));
    }
    if find_by_vendedor_fecha(pool, &data.codigo_vendedor, &data.fecha)
        .await?
        .is_some()
    {
        return Err(RepoError::rule(ErrorCode::ChangeExistsForDate));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cambios (id, fecha, codigo_vendedor, valor_cambio, comentarios, usuario_creador, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.fecha)
    .bind(&data.codigo_vendedor)
    .bind(data.valor_cambio)
    .bind(&data.comentarios)
    .bind(&data.usuario_creador)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cambio".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CambioUpdate) -> RepoResult<Cambio> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cambio {id}")))?;

    let fecha = data.fecha.clone().unwrap_or_else(|| current.fecha.clone());
    check_fecha(&fecha)?;
    let codigo_vendedor = data
        .codigo_vendedor
        .clone()
        .unwrap_or_else(|| current.codigo_vendedor.clone());

    // Same duplicate guard as create, excluding self
    let clash: Option<i64> =
        sqlx::query_scalar("SELECT id FROM cambios WHERE fecha = ? AND codigo_vendedor = ? AND id != ?")
            .bind(&fecha)
            .bind(&codigo_vendedor)
            .bind(id)
            .fetch_optional(pool)
            .await?;
    if clash.is_some() {
        return Err(RepoError::rule(ErrorCode::ChangeExistsForDate));
    }

    sqlx::query(
        "UPDATE cambios SET fecha = ?, codigo_vendedor = ?, valor_cambio = COALESCE(?, valor_cambio), comentarios = COALESCE(?, comentarios) WHERE id = ?",
    )
    .bind(&fecha)
    .bind(&codigo_vendedor)
    .bind(data.valor_cambio)
    .bind(&data.comentarios)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cambio {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cambios WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::db::repository::pedido::tests::seed_catalog;
    use crate::db::test_pool;

    pub fn payload(fecha: &str, valor: f64) -> CambioCreate {
        CambioCreate {
            fecha: fecha.into(),
            codigo_vendedor: "V01".into(),
            valor_cambio: valor,
            comentarios: None,
            usuario_creador: "admin".into(),
        }
    }

    #[tokio::test]
    async fn one_cambio_per_vendedor_and_fecha() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;

        create(&pool, payload("2025-03-10", 20_000.0)).await.unwrap();
        let err = create(&pool, payload("2025-03-10", 5000.0)).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::ChangeExistsForDate, _)
        ));
    }

    #[tokio::test]
    async fn update_guard_excludes_self() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let cambio = create(&pool, payload("2025-03-10", 20_000.0)).await.unwrap();

        // Updating only the amount must not trip the duplicate guard
        let updated = update(
            &pool,
            cambio.id,
            CambioUpdate {
                valor_cambio: Some(25_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.valor_cambio, 25_000.0);

        // Moving onto another cambio's (fecha, vendedor) is rejected
        create(&pool, payload("2025-03-11", 1000.0)).await.unwrap();
        let err = update(
            &pool,
            cambio.id,
            CambioUpdate {
                fecha: Some("2025-03-11".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::ChangeExistsForDate, _)
        ));
    }
}
