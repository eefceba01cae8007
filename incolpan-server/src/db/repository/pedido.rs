//! Daily order (pedido) repository

use super::documento::{check_fecha, price_lines};
use super::{RepoError, RepoResult, next_consecutivo};
use shared::ErrorCode;
use shared::models::{
    DocumentoItem, Page, Pedido, PedidoCreate, PedidoDetalle, PedidoResumen, PedidoUpdate,
};
use sqlx::SqlitePool;

const PEDIDO_SELECT: &str = "SELECT id, consecutivo, codigo_vendedor, fecha, comentarios, usado, created_at, updated_at FROM pedidos";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Pedido>> {
    let sql = format!("{PEDIDO_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Pedido>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lookup by consecutive + seller; used by dispatch and consolidation
pub async fn find_by_consecutivo(
    pool: &SqlitePool,
    consecutivo: &str,
    codigo_vendedor: &str,
) -> RepoResult<Option<Pedido>> {
    let sql = format!("{PEDIDO_SELECT} WHERE consecutivo = ? AND codigo_vendedor = ?");
    let row = sqlx::query_as::<_, Pedido>(&sql)
        .bind(consecutivo)
        .bind(codigo_vendedor)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_of(pool: &SqlitePool, id: i64) -> RepoResult<Vec<DocumentoItem>> {
    let rows = sqlx::query_as::<_, DocumentoItem>(
        "SELECT id, doc_id, producto_cod, cantidad, precio_unit, subtotal FROM pedido_items WHERE doc_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<PedidoDetalle>> {
    let Some(pedido) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = items_of(pool, id).await?;
    let total = items.iter().map(|i| i.subtotal).sum();
    Ok(Some(PedidoDetalle {
        pedido,
        items,
        total,
    }))
}

/// Paged listing with optional exact-date and consecutive-substring
/// filters; each row carries the document total.
pub async fn list(
    pool: &SqlitePool,
    fecha: Option<&str>,
    consecutivo: Option<&str>,
    page: u32,
    per_page: u32,
) -> RepoResult<Page<PedidoResumen>> {
    let mut where_sql = String::from("WHERE 1=1");
    if fecha.is_some() {
        where_sql.push_str(" AND p.fecha = ?");
    }
    if consecutivo.is_some() {
        where_sql.push_str(" AND p.consecutivo LIKE ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM pedidos p {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(f) = fecha {
        count_query = count_query.bind(f.to_string());
    }
    if let Some(c) = consecutivo {
        count_query = count_query.bind(format!("%{c}%"));
    }
    let total_items = count_query.fetch_one(pool).await?;

    let list_sql = format!(
        "SELECT p.id, p.consecutivo, p.codigo_vendedor, p.fecha, p.comentarios, p.usado, COALESCE(SUM(i.subtotal), 0) AS total, p.created_at, p.updated_at \
         FROM pedidos p LEFT JOIN pedido_items i ON i.doc_id = p.id {where_sql} \
         GROUP BY p.id ORDER BY p.fecha DESC, p.consecutivo DESC LIMIT ? OFFSET ?"
    );
    let mut list_query = sqlx::query_as::<_, PedidoResumen>(&list_sql);
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

pub async fn create(pool: &SqlitePool, data: PedidoCreate) -> RepoResult<PedidoDetalle> {
    check_fecha(&data.fecha)?;
    if super::vendedor::find_by_codigo(pool, &data.codigo_vendedor)
        .await?
        .is_none()
    {
        return Err(RepoError::rule(ErrorCode::SellerNotFound));
    }

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM pedidos WHERE codigo_vendedor = ? AND fecha = ?")
            .bind(&data.codigo_vendedor)
            .bind(&data.fecha)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(RepoError::rule(ErrorCode::OrderExistsForDate));
    }

    let lines = price_lines(pool, &data.items).await?;
    let consecutivo = next_consecutivo(pool, "pedidos", "consecutivo", "PD").await?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO pedidos (id, consecutivo, codigo_vendedor, fecha, comentarios, usado, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
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
            "INSERT INTO pedido_items (id, doc_id, producto_cod, cantidad, precio_unit, subtotal) VALUES (?, ?, ?, ?, ?, ?)",
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
        .ok_or_else(|| RepoError::Database("Failed to create pedido".into()))
}

/// Update header fields and, when `items` is present, replace and
/// reprice the lines.
pub async fn update(pool: &SqlitePool, id: i64, data: PedidoUpdate) -> RepoResult<PedidoDetalle> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pedido {id}")))?;

    if let Some(fecha) = &data.fecha {
        check_fecha(fecha)?;
        if *fecha != current.fecha {
            let clash: Option<i64> = sqlx::query_scalar(
                "SELECT id FROM pedidos WHERE codigo_vendedor = ? AND fecha = ? AND id != ?",
            )
            .bind(&current.codigo_vendedor)
            .bind(fecha)
            .bind(id)
            .fetch_optional(pool)
            .await?;
            if clash.is_some() {
                return Err(RepoError::rule(ErrorCode::OrderExistsForDate));
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
        "UPDATE pedidos SET fecha = COALESCE(?, fecha), comentarios = COALESCE(?, comentarios), updated_at = ? WHERE id = ?",
    )
    .bind(&data.fecha)
    .bind(&data.comentarios)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(lines) = &lines {
        sqlx::query("DELETE FROM pedido_items WHERE doc_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for line in lines {
            sqlx::query(
                "INSERT INTO pedido_items (id, doc_id, producto_cod, cantidad, precio_unit, subtotal) VALUES (?, ?, ?, ?, ?, ?)",
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
        .ok_or_else(|| RepoError::NotFound(format!("Pedido {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM pedidos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::db::repository::{producto, vendedor};
    use crate::db::test_pool;
    use shared::models::{DocumentoItemCreate, ProductoCreate, VendedorCreate};

    pub async fn seed_catalog(pool: &SqlitePool) {
        vendedor::create(
            pool,
            VendedorCreate {
                codigo_vendedor: "V01".into(),
                nombre: "Carlos".into(),
                rol: "vendedor".into(),
                comision_panaderia: 10.0,
                comision_bizcocheria: 12.0,
            },
        )
        .await
        .unwrap();
        producto::create(
            pool,
            ProductoCreate {
                codigo: "P001".into(),
                nombre: "Pan aliñado".into(),
                precio: 1000.0,
                categoria: "panaderia".into(),
            },
        )
        .await
        .unwrap();
        producto::create(
            pool,
            ProductoCreate {
                codigo: "B001".into(),
                nombre: "Torta fría".into(),
                precio: 5000.0,
                categoria: "bizcocheria".into(),
            },
        )
        .await
        .unwrap();
    }

    fn payload(fecha: &str) -> PedidoCreate {
        PedidoCreate {
            codigo_vendedor: "V01".into(),
            fecha: fecha.into(),
            comentarios: None,
            items: vec![
                DocumentoItemCreate {
                    producto_cod: "P001".into(),
                    cantidad: 10,
                },
                DocumentoItemCreate {
                    producto_cod: "B001".into(),
                    cantidad: 2,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_prices_from_catalog() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;

        let created = create(&pool, payload("2025-03-10")).await.unwrap();
        assert_eq!(created.pedido.consecutivo, "PD-00001");
        assert_eq!(created.items.len(), 2);
        assert_eq!(created.total, 10.0 * 1000.0 + 2.0 * 5000.0);
        assert!(!created.pedido.usado);
    }

    #[tokio::test]
    async fn one_pedido_per_vendedor_and_fecha() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        create(&pool, payload("2025-03-10")).await.unwrap();

        let err = create(&pool, payload("2025-03-10")).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::OrderExistsForDate, _)
        ));

        // A different date is fine
        create(&pool, payload("2025-03-11")).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_product_and_empty_items_rejected() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;

        let mut bad = payload("2025-03-10");
        bad.items[0].producto_cod = "NOPE".into();
        let err = create(&pool, bad).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::ProductNotFound, _)));

        let mut empty = payload("2025-03-10");
        empty.items.clear();
        let err = create(&pool, empty).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::EmptyDocument, _)));
    }

    #[tokio::test]
    async fn update_replaces_and_reprices_items() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let created = create(&pool, payload("2025-03-10")).await.unwrap();

        let updated = update(
            &pool,
            created.pedido.id,
            PedidoUpdate {
                fecha: None,
                comentarios: Some("ajustado".into()),
                items: Some(vec![DocumentoItemCreate {
                    producto_cod: "P001".into(),
                    cantidad: 5,
                }]),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.total, 5000.0);
        assert_eq!(updated.pedido.comentarios.as_deref(), Some("ajustado"));
    }

    #[tokio::test]
    async fn list_filters_by_fecha_and_paginates() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        create(&pool, payload("2025-03-10")).await.unwrap();
        create(&pool, payload("2025-03-11")).await.unwrap();

        let page = list(&pool, Some("2025-03-10"), None, 1, 20).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].fecha, "2025-03-10");
        assert_eq!(page.items[0].total, 20_000.0);

        let all = list(&pool, None, Some("PD-"), 1, 1).await.unwrap();
        assert_eq!(all.total_items, 2);
        assert_eq!(all.items.len(), 1);
        assert_eq!(all.total_pages, 2);
    }

    #[tokio::test]
    async fn list_tolerates_oversized_page_numbers() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        create(&pool, payload("2025-03-10")).await.unwrap();

        let far = list(&pool, None, None, u32::MAX, 200).await.unwrap();
        assert!(far.items.is_empty());
        assert_eq!(far.total_items, 1);
    }

    #[tokio::test]
    async fn delete_cascades_items() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let created = create(&pool, payload("2025-03-10")).await.unwrap();
        assert!(delete(&pool, created.pedido.id).await.unwrap());
        assert!(items_of(&pool, created.pedido.id).await.unwrap().is_empty());
    }
}
