//! Extra order repository
//!
//! Mirrors the pedido repository over the extras tables with the "EX"
//! consecutive prefix.

use super::documento::{check_fecha, price_lines};
use super::{RepoError, RepoResult, next_consecutivo};
use shared::ErrorCode;
use shared::models::{
    DocumentoItem, Extra, ExtraCreate, ExtraDetalle, ExtraResumen, ExtraUpdate, Page,
};
use sqlx::SqlitePool;

const EXTRA_SELECT: &str = "SELECT id, consecutivo, codigo_vendedor, fecha, comentarios, usado, created_at, updated_at FROM extras";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Extra>> {
    let sql = format!("{EXTRA_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Extra>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_consecutivo(
    pool: &SqlitePool,
    consecutivo: &str,
    codigo_vendedor: &str,
) -> RepoResult<Option<Extra>> {
    let sql = format!("{EXTRA_SELECT} WHERE consecutivo = ? AND codigo_vendedor = ?");
    let row = sqlx::query_as::<_, Extra>(&sql)
        .bind(consecutivo)
        .bind(codigo_vendedor)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_of(pool: &SqlitePool, id: i64) -> RepoResult<Vec<DocumentoItem>> {
    let rows = sqlx::query_as::<_, DocumentoItem>(
        "SELECT id, doc_id, producto_cod, cantidad, precio_unit, subtotal FROM extra_items WHERE doc_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<ExtraDetalle>> {
    let Some(extra) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = items_of(pool, id).await?;
    let total = items.iter().map(|i| i.subtotal).sum();
    Ok(Some(ExtraDetalle {
        extra,
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
) -> RepoResult<Page<ExtraResumen>> {
    let mut where_sql = String::from("WHERE 1=1");
    if fecha.is_some() {
        where_sql.push_str(" AND e.fecha = ?");
    }
    if consecutivo.is_some() {
        where_sql.push_str(" AND e.consecutivo LIKE ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM extras e {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(f) = fecha {
        count_query = count_query.bind(f.to_string());
    }
    if let Some(c) = consecutivo {
        count_query = count_query.bind(format!("%{c}%"));
    }
    let total_items = count_query.fetch_one(pool).await?;

    let list_sql = format!(
        "SELECT e.id, e.consecutivo, e.codigo_vendedor, e.fecha, e.comentarios, e.usado, COALESCE(SUM(i.subtotal), 0) AS total, e.created_at, e.updated_at \
         FROM extras e LEFT JOIN extra_items i ON i.doc_id = e.id {where_sql} \
         GROUP BY e.id ORDER BY e.fecha DESC, e.consecutivo DESC LIMIT ? OFFSET ?"
    );
    let mut list_query = sqlx::query_as::<_, ExtraResumen>(&list_sql);
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

pub async fn create(pool: &SqlitePool, data: ExtraCreate) -> RepoResult<ExtraDetalle> {
    check_fecha(&data.fecha)?;
    if super::vendedor::find_by_codigo(pool, &data.codigo_vendedor)
        .await?
        .is_none()
    {
        return Err(RepoError::rule(ErrorCode::SellerNotFound));
    }

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM extras WHERE codigo_vendedor = ? AND fecha = ?")
            .bind(&data.codigo_vendedor)
            .bind(&data.fecha)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(RepoError::rule(ErrorCode::ExtraExistsForDate));
    }

    let lines = price_lines(pool, &data.items).await?;
    let consecutivo = next_consecutivo(pool, "extras", "consecutivo", "EX").await?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO extras (id, consecutivo, codigo_vendedor, fecha, comentarios, usado, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
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
            "INSERT INTO extra_items (id, doc_id, producto_cod, cantidad, precio_unit, subtotal) VALUES (?, ?, ?, ?, ?, ?)",
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
        .ok_or_else(|| RepoError::Database("Failed to create extra".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ExtraUpdate) -> RepoResult<ExtraDetalle> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Extra {id}")))?;

    if let Some(fecha) = &data.fecha {
        check_fecha(fecha)?;
        if *fecha != current.fecha {
            let clash: Option<i64> = sqlx::query_scalar(
                "SELECT id FROM extras WHERE codigo_vendedor = ? AND fecha = ? AND id != ?",
            )
            .bind(&current.codigo_vendedor)
            .bind(fecha)
            .bind(id)
            .fetch_optional(pool)
            .await?;
            if clash.is_some() {
                return Err(RepoError::rule(ErrorCode::ExtraExistsForDate));
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
        "UPDATE extras SET fecha = COALESCE(?, fecha), comentarios = COALESCE(?, comentarios), updated_at = ? WHERE id = ?",
    )
    .bind(&data.fecha)
    .bind(&data.comentarios)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(lines) = &lines {
        sqlx::query("DELETE FROM extra_items WHERE doc_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for line in lines {
            sqlx::query(
                "INSERT INTO extra_items (id, doc_id, producto_cod, cantidad, precio_unit, subtotal) VALUES (?, ?, ?, ?, ?, ?)",
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
        .ok_or_else(|| RepoError::NotFound(format!("Extra {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM extras WHERE id = ?")
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

    fn payload(fecha: &str) -> ExtraCreate {
        ExtraCreate {
            codigo_vendedor: "V01".into(),
            fecha: fecha.into(),
            comentarios: Some("refuerzo tarde".into()),
            items: vec![DocumentoItemCreate {
                producto_cod: "P001".into(),
                cantidad: 4,
            }],
        }
    }

    #[tokio::test]
    async fn create_uses_ex_prefix_and_guards_duplicates() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;

        let created = create(&pool, payload("2025-03-10")).await.unwrap();
        assert_eq!(created.extra.consecutivo, "EX-00001");
        assert_eq!(created.total, 4000.0);

        let err = create(&pool, payload("2025-03-10")).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::ExtraExistsForDate, _)
        ));
    }

    #[tokio::test]
    async fn pedido_and_extra_guards_are_independent() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        // A pedido on the same date does not block the extra
        crate::db::repository::pedido::create(
            &pool,
            shared::models::PedidoCreate {
                codigo_vendedor: "V01".into(),
                fecha: "2025-03-10".into(),
                comentarios: None,
                items: vec![DocumentoItemCreate {
                    producto_cod: "P001".into(),
                    cantidad: 1,
                }],
            },
        )
        .await
        .unwrap();
        create(&pool, payload("2025-03-10")).await.unwrap();
    }
}
