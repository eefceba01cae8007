//! Dispatch slip (despacho) repository

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{
    Despacho, DespachoCreate, DespachoDetalle, DespachoItem, DespachoItemCreate, DespachoPrefill,
    DespachoPrefillLinea, DespachoUpdate, ORIGEN_EXTRA, ORIGEN_PEDIDO, Page,
};
use sqlx::SqlitePool;

const DESPACHO_SELECT: &str = "SELECT id, fecha, vendedor_cod, codigo_origen, tipo_origen, despachado, comentarios, created_at, updated_at FROM despachos";

/// Origin document header resolved by consecutive
struct Origen {
    vendedor_cod: String,
    fecha: String,
}

/// Resolve a pedido or extra by its consecutive, regardless of seller.
async fn find_origen(
    pool: &SqlitePool,
    codigo_origen: &str,
    tipo_origen: &str,
) -> RepoResult<Option<Origen>> {
    let table = match tipo_origen {
        ORIGEN_PEDIDO => "pedidos",
        ORIGEN_EXTRA => "extras",
        other => {
            return Err(RepoError::Validation(format!(
                "Unknown tipo_origen: {other}"
            )));
        }
    };
    let sql = format!("SELECT codigo_vendedor, fecha FROM {table} WHERE consecutivo = ?");
    let row: Option<(String, String)> = sqlx::query_as(&sql)
        .bind(codigo_origen)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(vendedor_cod, fecha)| Origen {
        vendedor_cod,
        fecha,
    }))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Despacho>> {
    let sql = format!("{DESPACHO_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Despacho>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The despacho covering an origin document, used by consolidation to
/// read shipped quantities.
pub async fn find_by_origen(
    pool: &SqlitePool,
    codigo_origen: &str,
    vendedor_cod: &str,
) -> RepoResult<Option<Despacho>> {
    let sql = format!("{DESPACHO_SELECT} WHERE codigo_origen = ? AND vendedor_cod = ?");
    let row = sqlx::query_as::<_, Despacho>(&sql)
        .bind(codigo_origen)
        .bind(vendedor_cod)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_of(pool: &SqlitePool, id: i64) -> RepoResult<Vec<DespachoItem>> {
    let rows = sqlx::query_as::<_, DespachoItem>(
        "SELECT id, despacho_id, producto_cod, cantidad_pedida, cantidad, lote, precio_unitario, subtotal FROM despacho_items WHERE despacho_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<DespachoDetalle>> {
    let Some(despacho) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = items_of(pool, id).await?;
    let total = items.iter().map(|i| i.subtotal).sum();
    Ok(Some(DespachoDetalle {
        despacho,
        items,
        total,
    }))
}

pub async fn list(
    pool: &SqlitePool,
    fecha: Option<&str>,
    vendedor_cod: Option<&str>,
    page: u32,
    per_page: u32,
) -> RepoResult<Page<Despacho>> {
    let mut where_sql = String::from("WHERE 1=1");
    if fecha.is_some() {
        where_sql.push_str(" AND fecha = ?");
    }
    if vendedor_cod.is_some() {
        where_sql.push_str(" AND vendedor_cod = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM despachos {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(f) = fecha {
        count_query = count_query.bind(f.to_string());
    }
    if let Some(v) = vendedor_cod {
        count_query = count_query.bind(v.to_string());
    }
    let total_items = count_query.fetch_one(pool).await?;

    let list_sql = format!(
        "{DESPACHO_SELECT} {where_sql} ORDER BY fecha DESC, codigo_origen DESC LIMIT ? OFFSET ?"
    );
    let mut list_query = sqlx::query_as::<_, Despacho>(&list_sql);
    if let Some(f) = fecha {
        list_query = list_query.bind(f.to_string());
    }
    if let Some(v) = vendedor_cod {
        list_query = list_query.bind(v.to_string());
    }
    let items = list_query
        .bind(per_page as i64)
        .bind(super::page_offset(page, per_page))
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, page, per_page, total_items))
}

/// The dispatch form prefill: the origin's ordered quantities with
/// current catalog prices.
pub async fn prefill(
    pool: &SqlitePool,
    codigo_origen: &str,
    tipo_origen: &str,
) -> RepoResult<DespachoPrefill> {
    let origen = find_origen(pool, codigo_origen, tipo_origen)
        .await?
        .ok_or_else(|| RepoError::rule(ErrorCode::DispatchOriginNotFound))?;

    let items_table = match tipo_origen {
        ORIGEN_PEDIDO => "pedido_items i JOIN pedidos d ON i.doc_id = d.id",
        _ => "extra_items i JOIN extras d ON i.doc_id = d.id",
    };
    let sql = format!(
        "SELECT i.producto_cod, p.nombre, i.cantidad AS cantidad_pedida, p.precio AS precio_unitario \
         FROM {items_table} JOIN productos p ON p.codigo = i.producto_cod \
         WHERE d.consecutivo = ? ORDER BY i.id"
    );
    let items = sqlx::query_as::<_, DespachoPrefillLinea>(&sql)
        .bind(codigo_origen)
        .fetch_all(pool)
        .await?;

    Ok(DespachoPrefill {
        codigo_origen: codigo_origen.to_string(),
        tipo_origen: tipo_origen.to_string(),
        vendedor_cod: origen.vendedor_cod,
        fecha: origen.fecha,
        items,
    })
}

/// Price the payload lines against the catalog before opening the
/// write transaction.
async fn price_items(
    pool: &SqlitePool,
    items: &[DespachoItemCreate],
) -> RepoResult<Vec<(DespachoItemCreate, f64)>> {
    let mut priced = Vec::with_capacity(items.len());
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
        priced.push((item.clone(), precio));
    }
    Ok(priced)
}

async fn insert_items(
    tx: &mut sqlx::SqliteConnection,
    despacho_id: i64,
    priced: &[(DespachoItemCreate, f64)],
) -> RepoResult<()> {
    for (item, precio) in priced {
        sqlx::query(
            "INSERT INTO despacho_items (id, despacho_id, producto_cod, cantidad_pedida, cantidad, lote, precio_unitario, subtotal) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(despacho_id)
        .bind(&item.producto_cod)
        .bind(item.cantidad_pedida)
        .bind(item.cantidad)
        .bind(&item.lote)
        .bind(precio)
        .bind(precio * item.cantidad as f64)
        .execute(&mut *tx)
        .await?;
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: DespachoCreate) -> RepoResult<DespachoDetalle> {
    if data.items.is_empty() {
        return Err(RepoError::rule(ErrorCode::EmptyDocument));
    }
    let origen = find_origen(pool, &data.codigo_origen, &data.tipo_origen)
        .await?
        .ok_or_else(|| RepoError::rule(ErrorCode::DispatchOriginNotFound))?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM despachos WHERE codigo_origen = ?")
        .bind(&data.codigo_origen)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(RepoError::rule(ErrorCode::DispatchExistsForOrigin));
    }

    let priced = price_items(pool, &data.items).await?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO despachos (id, fecha, vendedor_cod, codigo_origen, tipo_origen, despachado, comentarios, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?, ?)",
    )
    .bind(id)
    .bind(&origen.fecha)
    .bind(&origen.vendedor_cod)
    .bind(&data.codigo_origen)
    .bind(&data.tipo_origen)
    .bind(&data.comentarios)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_items(&mut tx, id, &priced).await?;
    tx.commit().await?;

    detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create despacho".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DespachoUpdate) -> RepoResult<DespachoDetalle> {
    if find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Despacho {id}")));
    }

    let priced = match &data.items {
        Some(items) => {
            if items.is_empty() {
                return Err(RepoError::rule(ErrorCode::EmptyDocument));
            }
            Some(price_items(pool, items).await?)
        }
        None => None,
    };

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE despachos SET comentarios = COALESCE(?, comentarios), updated_at = ? WHERE id = ?",
    )
    .bind(&data.comentarios)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(priced) = &priced {
        sqlx::query("DELETE FROM despacho_items WHERE despacho_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, id, priced).await?;
    }
    tx.commit().await?;

    detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Despacho {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM despachos WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::db::repository::pedido::{self, tests::seed_catalog};
    use crate::db::test_pool;
    use shared::models::{DocumentoItemCreate, PedidoCreate};

    pub async fn seed_pedido(pool: &SqlitePool, fecha: &str) -> String {
        let pedido = pedido::create(
            pool,
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
            },
        )
        .await
        .unwrap();
        pedido.pedido.consecutivo
    }

    fn payload(codigo_origen: &str) -> DespachoCreate {
        DespachoCreate {
            codigo_origen: codigo_origen.into(),
            tipo_origen: "pedido".into(),
            comentarios: None,
            items: vec![
                DespachoItemCreate {
                    producto_cod: "P001".into(),
                    cantidad_pedida: 10,
                    cantidad: 8,
                    lote: Some("L-31".into()),
                },
                DespachoItemCreate {
                    producto_cod: "B001".into(),
                    cantidad_pedida: 2,
                    cantidad: 2,
                    lote: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_copies_seller_and_date_from_origin() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let consecutivo = seed_pedido(&pool, "2025-03-10").await;

        let created = create(&pool, payload(&consecutivo)).await.unwrap();
        assert_eq!(created.despacho.vendedor_cod, "V01");
        assert_eq!(created.despacho.fecha, "2025-03-10");
        assert!(created.despacho.despachado);
        // Subtotals use shipped quantity, not ordered
        assert_eq!(created.total, 8.0 * 1000.0 + 2.0 * 5000.0);
    }

    #[tokio::test]
    async fn one_despacho_per_origin() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let consecutivo = seed_pedido(&pool, "2025-03-10").await;
        create(&pool, payload(&consecutivo)).await.unwrap();

        let err = create(&pool, payload(&consecutivo)).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::DispatchExistsForOrigin, _)
        ));
    }

    #[tokio::test]
    async fn missing_origin_rejected() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let err = create(&pool, payload("PD-99999")).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::DispatchOriginNotFound, _)
        ));
    }

    #[tokio::test]
    async fn prefill_returns_origin_lines_with_catalog_prices() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let consecutivo = seed_pedido(&pool, "2025-03-10").await;

        let prefill = prefill(&pool, &consecutivo, "pedido").await.unwrap();
        assert_eq!(prefill.vendedor_cod, "V01");
        assert_eq!(prefill.items.len(), 2);
        assert_eq!(prefill.items[0].cantidad_pedida, 10);
        assert_eq!(prefill.items[0].precio_unitario, 1000.0);
    }
}
