//! Return (devolucion) repository
//!
//! Devoluciones follow the pedido shape but allow two documents per
//! seller and date, and track `usos`: how many consolidated sales
//! reference the document (cap 2, once as same-day and once as
//! previous-day return).

use super::documento::{check_fecha, price_lines};
use super::{RepoError, RepoResult, next_consecutivo};
use shared::ErrorCode;
use shared::models::{
    Devolucion, DevolucionCreate, DevolucionDetalle, DevolucionResumen, DevolucionUpdate,
    DocumentoItem, MAX_DEVOLUCIONES_POR_DIA, Page,
};
use sqlx::SqlitePool;

const DEVOLUCION_SELECT: &str = "SELECT id, consecutivo, codigo_vendedor, fecha, comentarios, usos, created_at, updated_at FROM devoluciones";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Devolucion>> {
    let sql = format!("{DEVOLUCION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Devolucion>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lookup by consecutive + seller. Consolidation fetches its return
/// sources this way, with no date filter: yesterday's devolucion is a
/// valid source for today's venta.
pub async fn find_by_consecutivo(
    pool: &SqlitePool,
    consecutivo: &str,
    codigo_vendedor: &str,
) -> RepoResult<Option<Devolucion>> {
    let sql = format!("{DEVOLUCION_SELECT} WHERE consecutivo = ? AND codigo_vendedor = ?");
    let row = sqlx::query_as::<_, Devolucion>(&sql)
        .bind(consecutivo)
        .bind(codigo_vendedor)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_of(pool: &SqlitePool, id: i64) -> RepoResult<Vec<DocumentoItem>> {
    let rows = sqlx::query_as::<_, DocumentoItem>(
        "SELECT id, doc_id, producto_cod, cantidad, precio_unit, subtotal FROM devolucion_items WHERE doc_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<DevolucionDetalle>> {
    let Some(devolucion) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = items_of(pool, id).await?;
    let total = items.iter().map(|i| i.subtotal).sum();
    Ok(Some(DevolucionDetalle {
        devolucion,
        items,
        total,
    }))
}

pub async fn list(
    pool: &SqlitePool,
    fecha: Option<&str>,
    consecutivo: Option<&str>,
    page: u32,
    per_page: u32,
) -> RepoResult<Page<DevolucionResumen>> {
    let mut where_sql = String::from("WHERE 1=1");
    if fecha.is_some() {
        where_sql.push_str(" AND d.fecha = ?");
    }
    if consecutivo.is_some() {
        where_sql.push_str(" AND d.consecutivo LIKE ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM devoluciones d {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(f) = fecha {
        count_query = count_query.bind(f.to_string());
    }
    if let Some(c) = consecutivo {
        count_query = count_query.bind(format!("%{c}%"));
    }
    let total_items = count_query.fetch_one(pool).await?;

    let list_sql = format!(
        "SELECT d.id, d.consecutivo, d.codigo_vendedor, d.fecha, d.comentarios, d.usos, COALESCE(SUM(i.subtotal), 0) AS total, d.created_at, d.updated_at \
         FROM devoluciones d LEFT JOIN devolucion_items i ON i.doc_id = d.id {where_sql} \
         GROUP BY d.id ORDER BY d.fecha DESC, d.consecutivo DESC LIMIT ? OFFSET ?"
    );
    let mut list_query = sqlx::query_as::<_, DevolucionResumen>(&list_sql);
    if let Some(f) = fecha {
        list_query = list_query.bind(f.to_string());
    }
    if let Some(c) = consecutivo {
        list_query = list_query.bind(format!("%{c}%"));
    }
    let items = list_query
        .bind(per_page as i64)
        .bind(super::page_offset(page, per_page))
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, page, per_page, total_items))
}

pub async fn create(pool: &SqlitePool, data: DevolucionCreate) -> RepoResult<DevolucionDetalle> {
    check_fecha(&data.fecha)?;
    if super::vendedor::find_by_codigo(pool, &data.codigo_vendedor)
        .await?
        .is_none()
    {
        return Err(RepoError::rule(ErrorCode::SellerNotFound));
    }

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM devoluciones WHERE codigo_vendedor = ? AND fecha = ?")
            .bind(&data.codigo_vendedor)
            .bind(&data.fecha)
            .fetch_one(pool)
            .await?;
    if count >= MAX_DEVOLUCIONES_POR_DIA {
        return Err(RepoError::rule(ErrorCode::ReturnLimitReached));
    }

    let lines = price_lines(pool, &data.items).await?;
    let consecutivo = next_consecutivo(pool, "devoluciones", "consecutivo", "DV").await?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO devoluciones (id, consecutivo, codigo_vendedor, fecha, comentarios, usos, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(id)
    .bind(&consecutivo)
    .bind(&data.codigo_vendedor)
    .bind(&data.fecha)
    .bind(&data.comentarios)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for line in &lines {
        sqlx::query(
            "INSERT INTO devolucion_items (id, doc_id, producto_cod, cantidad, precio_unit, subtotal) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(&line.producto_cod)
        .bind(line.cantidad)
        .bind(line.precio_unit)
        .bind(line.subtotal)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create devolucion".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: DevolucionUpdate,
) -> RepoResult<DevolucionDetalle> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Devolucion {id}")))?;

    if let Some(fecha) = &data.fecha {
        check_fecha(fecha)?;
        if *fecha != current.fecha {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM devoluciones WHERE codigo_vendedor = ? AND fecha = ? AND id != ?",
            )
            .bind(&current.codigo_vendedor)
            .bind(fecha)
            .bind(id)
            .fetch_one(pool)
            .await?;
            if count >= MAX_DEVOLUCIONES_POR_DIA {
                return Err(RepoError::rule(ErrorCode::ReturnLimitReached));
            }
        }
    }

    let lines = match &data.items {
        Some(items) => Some(price_lines(pool, items).await?),
        None => None,
    };

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE devoluciones SET fecha = COALESCE(?, fecha), comentarios = COALESCE(?, comentarios), updated_at = ? WHERE id = ?",
    )
    .bind(&data.fecha)
    .bind(&data.comentarios)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(lines) = &lines {
        sqlx::query("DELETE FROM devolucion_items WHERE doc_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for line in lines {
            sqlx::query(
                "INSERT INTO devolucion_items (id, doc_id, producto_cod, cantidad, precio_unit, subtotal) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(shared::util::snowflake_id())
            .bind(id)
            .bind(&line.producto_cod)
            .bind(line.cantidad)
            .bind(line.precio_unit)
            .bind(line.subtotal)
            .execute(&mut *tx)
            .await?;
        }
    }
    tx.commit().await?;

    detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Devolucion {id}")))
}

/// Delete a devolucion; rejected while a consolidated sale references it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let current = find_by_id(pool, id).await?;
    let Some(current) = current else {
        return Ok(false);
    };
    if current.usos > 0 {
        return Err(RepoError::rule(ErrorCode::ReturnInUse));
    }
    let rows = sqlx::query("DELETE FROM devoluciones WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::pedido::tests::seed_catalog;
    use crate::db::test_pool;
    use shared::models::DocumentoItemCreate;

    fn payload(fecha: &str) -> DevolucionCreate {
        DevolucionCreate {
            codigo_vendedor: "V01".into(),
            fecha: fecha.into(),
            comentarios: None,
            items: vec![DocumentoItemCreate {
                producto_cod: "P001".into(),
                cantidad: 3,
            }],
        }
    }

    #[tokio::test]
    async fn two_per_date_allowed_third_rejected() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let first = create(&pool, payload("2025-03-10")).await.unwrap();
        assert_eq!(first.devolucion.consecutivo, "DV-00001");
        assert_eq!(first.devolucion.usos, 0);
        create(&pool, payload("2025-03-10")).await.unwrap();

        let err = create(&pool, payload("2025-03-10")).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::ReturnLimitReached, _)
        ));
    }

    #[tokio::test]
    async fn delete_rejected_while_in_use() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let dv = create(&pool, payload("2025-03-10")).await.unwrap();

        sqlx::query("UPDATE devoluciones SET usos = 1 WHERE id = ?")
            .bind(dv.devolucion.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = delete(&pool, dv.devolucion.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::ReturnInUse, _)));

        sqlx::query("UPDATE devoluciones SET usos = 0 WHERE id = ?")
            .bind(dv.devolucion.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(delete(&pool, dv.devolucion.id).await.unwrap());
    }
}
