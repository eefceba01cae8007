//! Consolidated daily sale (venta) repository
//!
//! The consolidation nets up to four source documents per product:
//!
//! ```text
//! total = dev_anterior + pedido + extra - dev_dia
//! ```
//!
//! Pedido and extra quantities are read from the DISPATCH covering the
//! document (shipped amounts), not from the document itself. Return
//! quantities come straight from the devolucion lines. Negative nets are
//! allowed: a seller can return more than went out that day.

use std::collections::BTreeMap;

use super::documento::check_fecha;
use super::{RepoError, RepoResult, next_consecutivo};
use shared::ErrorCode;
use shared::models::{
    MAX_USOS_DEVOLUCION, Page, Venta, VentaDetalle, VentaItem, VentaLinea, VentaPreview,
    VentaRequest,
};
use sqlx::SqlitePool;

const VENTA_SELECT: &str = "SELECT id, consecutivo, codigo_vendedor, fecha, codigo_dev_anterior, codigo_pedido, codigo_extra, codigo_dev_dia, devolucion_anterior, pedido, extras, devolucion_dia, total_venta, comision, pagar_pan, liquidada, created_at, updated_at FROM ventas";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Venta>> {
    let sql = format!("{VENTA_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Venta>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The pending (or settled) venta for a seller and date
pub async fn find_by_vendedor_fecha(
    pool: &SqlitePool,
    codigo_vendedor: &str,
    fecha: &str,
) -> RepoResult<Option<Venta>> {
    let sql = format!("{VENTA_SELECT} WHERE codigo_vendedor = ? AND fecha = ?");
    let row = sqlx::query_as::<_, Venta>(&sql)
        .bind(codigo_vendedor)
        .bind(fecha)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_of(pool: &SqlitePool, id: i64) -> RepoResult<Vec<VentaItem>> {
    let rows = sqlx::query_as::<_, VentaItem>(
        "SELECT id, venta_id, producto_cod, cantidad, precio_unit, subtotal, comision, pagar_pan FROM venta_items WHERE venta_id = ? ORDER BY producto_cod",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<VentaDetalle>> {
    let Some(venta) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = items_of(pool, id).await?;
    Ok(Some(VentaDetalle { venta, items }))
}

pub async fn list(
    pool: &SqlitePool,
    fecha: Option<&str>,
    consecutivo: Option<&str>,
    page: u32,
    per_page: u32,
) -> RepoResult<Page<Venta>> {
    let mut where_sql = String::from("WHERE 1=1");
    if fecha.is_some() {
        where_sql.push_str(" AND fecha = ?");
    }
    if consecutivo.is_some() {
        where_sql.push_str(" AND consecutivo LIKE ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM ventas {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(f) = fecha {
        count_query = count_query.bind(f.to_string());
    }
    if let Some(c) = consecutivo {
        count_query = count_query.bind(format!("%{c}%"));
    }
    let total_items = count_query.fetch_one(pool).await?;

    let list_sql =
        format!("{VENTA_SELECT} {where_sql} ORDER BY fecha DESC, consecutivo DESC LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query_as::<_, Venta>(&list_sql);
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

/// Per-product quantities accumulated across the four sources
#[derive(Debug, Default, Clone)]
struct Acumulado {
    dev_anterior: i32,
    pedido: i32,
    extra: i32,
    dev_dia: i32,
}

/// Quantity lines of a devolucion, fetched by consecutive + seller.
/// Guards `usos`: a return that already fed two consolidations is no
/// longer a valid source.
async fn devolucion_lines(
    pool: &SqlitePool,
    consecutivo: &str,
    codigo_vendedor: &str,
) -> RepoResult<Vec<(String, i32)>> {
    let devolucion = super::devolucion::find_by_consecutivo(pool, consecutivo, codigo_vendedor)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Devolucion {consecutivo}")))?;
    if devolucion.usos >= MAX_USOS_DEVOLUCION {
        return Err(RepoError::Rule(
            ErrorCode::ReturnUsesExhausted,
            format!("Devolucion {consecutivo} has exhausted its two uses"),
        ));
    }
    let rows: Vec<(String, i32)> = sqlx::query_as(
        "SELECT producto_cod, cantidad FROM devolucion_items WHERE doc_id = ? ORDER BY id",
    )
    .bind(devolucion.id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Shipped quantities for a pedido/extra, read from its dispatch slip.
async fn despacho_lines(
    pool: &SqlitePool,
    codigo_origen: &str,
    codigo_vendedor: &str,
) -> RepoResult<Vec<(String, i32)>> {
    let despacho = super::despacho::find_by_origen(pool, codigo_origen, codigo_vendedor)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("No despacho covers {codigo_origen}")))?;
    let rows: Vec<(String, i32)> = sqlx::query_as(
        "SELECT producto_cod, cantidad FROM despacho_items WHERE despacho_id = ? ORDER BY id",
    )
    .bind(despacho.id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Compute the consolidation breakdown without persisting anything.
///
/// This is both the preview endpoint and the first half of `create`.
pub async fn breakdown(pool: &SqlitePool, req: &VentaRequest) -> RepoResult<VentaPreview> {
    check_fecha(&req.fecha)?;
    let vendedor = super::vendedor::find_by_codigo(pool, &req.codigo_vendedor)
        .await?
        .ok_or_else(|| RepoError::rule(ErrorCode::SellerNotFound))?;

    let mut acumulado: BTreeMap<String, Acumulado> = BTreeMap::new();

    if let Some(codigo) = &req.codigo_dev_anterior {
        for (producto_cod, cantidad) in
            devolucion_lines(pool, codigo, &req.codigo_vendedor).await?
        {
            acumulado.entry(producto_cod).or_default().dev_anterior += cantidad;
        }
    }
    if let Some(codigo) = &req.codigo_pedido {
        // Pedido must belong to this seller before its dispatch counts
        super::pedido::find_by_consecutivo(pool, codigo, &req.codigo_vendedor)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Pedido {codigo}")))?;
        for (producto_cod, cantidad) in despacho_lines(pool, codigo, &req.codigo_vendedor).await? {
            acumulado.entry(producto_cod).or_default().pedido += cantidad;
        }
    }
    if let Some(codigo) = &req.codigo_extra {
        super::extra::find_by_consecutivo(pool, codigo, &req.codigo_vendedor)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Extra {codigo}")))?;
        for (producto_cod, cantidad) in despacho_lines(pool, codigo, &req.codigo_vendedor).await? {
            acumulado.entry(producto_cod).or_default().extra += cantidad;
        }
    }
    if let Some(codigo) = &req.codigo_dev_dia {
        for (producto_cod, cantidad) in
            devolucion_lines(pool, codigo, &req.codigo_vendedor).await?
        {
            acumulado.entry(producto_cod).or_default().dev_dia += cantidad;
        }
    }

    if acumulado.is_empty() {
        return Err(RepoError::rule(ErrorCode::EmptyConsolidation));
    }

    let mut lineas = Vec::with_capacity(acumulado.len());
    for (producto_cod, acc) in acumulado {
        let producto = super::producto::find_by_codigo(pool, &producto_cod)
            .await?
            .ok_or_else(|| {
                RepoError::Rule(
                    ErrorCode::ProductNotFound,
                    format!("Unknown product code {producto_cod}"),
                )
            })?;
        let total = acc.dev_anterior + acc.pedido + acc.extra - acc.dev_dia;
        let valor = producto.precio * total as f64;
        let pct = vendedor.comision_para(&producto.categoria) / 100.0;
        let comision = valor * pct;
        lineas.push(VentaLinea {
            producto_cod,
            nombre: producto.nombre,
            dev_anterior: acc.dev_anterior,
            pedido: acc.pedido,
            extra: acc.extra,
            dev_dia: acc.dev_dia,
            total,
            precio_unit: producto.precio,
            valor,
            comision,
            pagar_pan: valor - comision,
        });
    }

    Ok(VentaPreview {
        fecha: req.fecha.clone(),
        codigo_vendedor: req.codigo_vendedor.clone(),
        devolucion_anterior: lineas.iter().map(|l| l.dev_anterior).sum(),
        pedido: lineas.iter().map(|l| l.pedido).sum(),
        extras: lineas.iter().map(|l| l.extra).sum(),
        devolucion_dia: lineas.iter().map(|l| l.dev_dia).sum(),
        total_venta: lineas.iter().map(|l| l.valor).sum(),
        comision: lineas.iter().map(|l| l.comision).sum(),
        pagar_pan: lineas.iter().map(|l| l.pagar_pan).sum(),
        lineas,
    })
}

/// Consolidate and persist a venta.
///
/// Single transaction: the venta and its items are inserted, the
/// referenced pedido/extra flip to `usado = 1` and each referenced
/// devolucion gets `usos + 1`. The `usos < 2` condition in the UPDATE
/// re-checks the cap at write time, so two concurrent consolidations
/// cannot both consume a return's last use.
pub async fn create(pool: &SqlitePool, req: &VentaRequest) -> RepoResult<VentaDetalle> {
    if find_by_vendedor_fecha(pool, &req.codigo_vendedor, &req.fecha)
        .await?
        .is_some()
    {
        return Err(RepoError::rule(ErrorCode::SaleExistsForDate));
    }

    let preview = breakdown(pool, req).await?;
    let consecutivo = next_consecutivo(pool, "ventas", "consecutivo", "VT").await?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO ventas (id, consecutivo, codigo_vendedor, fecha, codigo_dev_anterior, codigo_pedido, codigo_extra, codigo_dev_dia, devolucion_anterior, pedido, extras, devolucion_dia, total_venta, comision, pagar_pan, liquidada, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(id)
    .bind(&consecutivo)
    .bind(&req.codigo_vendedor)
    .bind(&req.fecha)
    .bind(&req.codigo_dev_anterior)
    .bind(&req.codigo_pedido)
    .bind(&req.codigo_extra)
    .bind(&req.codigo_dev_dia)
    .bind(preview.devolucion_anterior)
    .bind(preview.pedido)
    .bind(preview.extras)
    .bind(preview.devolucion_dia)
    .bind(preview.total_venta)
    .bind(preview.comision)
    .bind(preview.pagar_pan)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for linea in &preview.lineas {
        sqlx::query(
            "INSERT INTO venta_items (id, venta_id, producto_cod, cantidad, precio_unit, subtotal, comision, pagar_pan) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(&linea.producto_cod)
        .bind(linea.total)
        .bind(linea.precio_unit)
        .bind(linea.valor)
        .bind(linea.comision)
        .bind(linea.pagar_pan)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(codigo) = &req.codigo_pedido {
        sqlx::query("UPDATE pedidos SET usado = 1, updated_at = ? WHERE consecutivo = ? AND codigo_vendedor = ?")
            .bind(now)
            .bind(codigo)
            .bind(&req.codigo_vendedor)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(codigo) = &req.codigo_extra {
        sqlx::query("UPDATE extras SET usado = 1, updated_at = ? WHERE consecutivo = ? AND codigo_vendedor = ?")
            .bind(now)
            .bind(codigo)
            .bind(&req.codigo_vendedor)
            .execute(&mut *tx)
            .await?;
    }
    for codigo in [&req.codigo_dev_anterior, &req.codigo_dev_dia]
        .into_iter()
        .flatten()
    {
        let rows = sqlx::query(
            "UPDATE devoluciones SET usos = usos + 1, updated_at = ? WHERE consecutivo = ? AND codigo_vendedor = ? AND usos < ?",
        )
        .bind(now)
        .bind(codigo)
        .bind(&req.codigo_vendedor)
        .bind(MAX_USOS_DEVOLUCION)
        .execute(&mut *tx)
        .await?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::Rule(
                ErrorCode::ReturnUsesExhausted,
                format!("Devolucion {codigo} has exhausted its two uses"),
            ));
        }
    }
    tx.commit().await?;

    detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create venta".into()))
}

/// Delete a venta, restoring its sources to their pre-consolidation
/// state: `usado = 0` on the pedido/extra and `usos - 1` (floor 0) on
/// each devolucion. Settled ventas cannot be deleted.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let Some(venta) = find_by_id(pool, id).await? else {
        return Ok(false);
    };
    if venta.liquidada {
        return Err(RepoError::rule(ErrorCode::SaleAlreadySettled));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    if let Some(codigo) = &venta.codigo_pedido {
        sqlx::query("UPDATE pedidos SET usado = 0, updated_at = ? WHERE consecutivo = ? AND codigo_vendedor = ?")
            .bind(now)
            .bind(codigo)
            .bind(&venta.codigo_vendedor)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(codigo) = &venta.codigo_extra {
        sqlx::query("UPDATE extras SET usado = 0, updated_at = ? WHERE consecutivo = ? AND codigo_vendedor = ?")
            .bind(now)
            .bind(codigo)
            .bind(&venta.codigo_vendedor)
            .execute(&mut *tx)
            .await?;
    }
    for codigo in [&venta.codigo_dev_anterior, &venta.codigo_dev_dia]
        .into_iter()
        .flatten()
    {
        sqlx::query(
            "UPDATE devoluciones SET usos = MAX(usos - 1, 0), updated_at = ? WHERE consecutivo = ? AND codigo_vendedor = ?",
        )
        .bind(now)
        .bind(codigo)
        .bind(&venta.codigo_vendedor)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM ventas WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(true)
}

/// Mark a venta settled / unsettled; used by the settlement repository
/// within its own transaction boundaries.
pub(crate) async fn set_liquidada(
    tx: &mut sqlx::SqliteConnection,
    venta_id: i64,
    liquidada: bool,
) -> RepoResult<()> {
    sqlx::query("UPDATE ventas SET liquidada = ?, updated_at = ? WHERE id = ?")
        .bind(liquidada)
        .bind(shared::util::now_millis())
        .bind(venta_id)
        .execute(&mut *tx)
        .await?;
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::db::repository::{despacho, devolucion, extra, pedido};
    use crate::db::repository::pedido::tests::seed_catalog;
    use crate::db::test_pool;
    use shared::models::{
        DespachoCreate, DespachoItemCreate, DevolucionCreate, DocumentoItemCreate, ExtraCreate,
        PedidoCreate,
    };

    /// Full scenario: previous-day return, pedido + dispatch, extra +
    /// dispatch, same-day return. Returns the four consecutives.
    pub async fn seed_full_day(pool: &SqlitePool) -> VentaRequest {
        seed_catalog(pool).await;

        // Previous-day return: 2x P001
        let dev_ant = devolucion::create(
            pool,
            DevolucionCreate {
                codigo_vendedor: "V01".into(),
                fecha: "2025-03-09".into(),
                comentarios: None,
                items: vec![DocumentoItemCreate {
                    producto_cod: "P001".into(),
                    cantidad: 2,
                }],
            },
        )
        .await
        .unwrap();

        // Pedido: 10x P001 + 2x B001 ordered; dispatch ships 8 and 2
        let ped = pedido::create(
            pool,
            PedidoCreate {
                codigo_vendedor: "V01".into(),
                fecha: "2025-03-10".into(),
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
        despacho::create(
            pool,
            DespachoCreate {
                codigo_origen: ped.pedido.consecutivo.clone(),
                tipo_origen: "pedido".into(),
                comentarios: None,
                items: vec![
                    DespachoItemCreate {
                        producto_cod: "P001".into(),
                        cantidad_pedida: 10,
                        cantidad: 8,
                        lote: None,
                    },
                    DespachoItemCreate {
                        producto_cod: "B001".into(),
                        cantidad_pedida: 2,
                        cantidad: 2,
                        lote: None,
                    },
                ],
            },
        )
        .await
        .unwrap();

        // Extra: 5x P001 ordered, 5 shipped
        let ext = extra::create(
            pool,
            ExtraCreate {
                codigo_vendedor: "V01".into(),
                fecha: "2025-03-10".into(),
                comentarios: None,
                items: vec![DocumentoItemCreate {
                    producto_cod: "P001".into(),
                    cantidad: 5,
                }],
            },
        )
        .await
        .unwrap();
        despacho::create(
            pool,
            DespachoCreate {
                codigo_origen: ext.extra.consecutivo.clone(),
                tipo_origen: "extra".into(),
                comentarios: None,
                items: vec![DespachoItemCreate {
                    producto_cod: "P001".into(),
                    cantidad_pedida: 5,
                    cantidad: 5,
                    lote: None,
                }],
            },
        )
        .await
        .unwrap();

        // Same-day return: 3x P001 + 1x B001
        let dev_dia = devolucion::create(
            pool,
            DevolucionCreate {
                codigo_vendedor: "V01".into(),
                fecha: "2025-03-10".into(),
                comentarios: None,
                items: vec![
                    DocumentoItemCreate {
                        producto_cod: "P001".into(),
                        cantidad: 3,
                    },
                    DocumentoItemCreate {
                        producto_cod: "B001".into(),
                        cantidad: 1,
                    },
                ],
            },
        )
        .await
        .unwrap();

        VentaRequest {
            fecha: "2025-03-10".into(),
            codigo_vendedor: "V01".into(),
            codigo_dev_anterior: Some(dev_ant.devolucion.consecutivo),
            codigo_pedido: Some(ped.pedido.consecutivo),
            codigo_extra: Some(ext.extra.consecutivo),
            codigo_dev_dia: Some(dev_dia.devolucion.consecutivo),
        }
    }

    #[tokio::test]
    async fn breakdown_nets_shipped_quantities() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;

        let preview = breakdown(&pool, &req).await.unwrap();
        assert_eq!(preview.lineas.len(), 2);

        // B001 first (BTreeMap order): 0 + 2 + 0 - 1 = 1
        let b = &preview.lineas[0];
        assert_eq!(b.producto_cod, "B001");
        assert_eq!(b.total, 1);
        assert_eq!(b.valor, 5000.0);
        // bizcocheria commission: 12%
        assert!((b.comision - 600.0).abs() < 1e-9);

        // P001: 2 + 8 + 5 - 3 = 12 at 1000 each
        let p = &preview.lineas[1];
        assert_eq!(p.producto_cod, "P001");
        assert_eq!(p.dev_anterior, 2);
        assert_eq!(p.pedido, 8); // shipped, not the ordered 10
        assert_eq!(p.extra, 5);
        assert_eq!(p.dev_dia, 3);
        assert_eq!(p.total, 12);
        assert_eq!(p.valor, 12_000.0);
        // panaderia commission: 10%
        assert!((p.comision - 1200.0).abs() < 1e-9);

        assert_eq!(preview.total_venta, 17_000.0);
        assert!((preview.pagar_pan - (17_000.0 - 1800.0)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn negative_net_is_allowed() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;
        // Only the same-day return: every product nets negative
        let only_dev = VentaRequest {
            codigo_dev_anterior: None,
            codigo_pedido: None,
            codigo_extra: None,
            ..req
        };
        let preview = breakdown(&pool, &only_dev).await.unwrap();
        assert_eq!(preview.lineas[1].total, -3);
        assert_eq!(preview.lineas[1].valor, -3000.0);
    }

    #[tokio::test]
    async fn create_marks_sources_and_guards_duplicates() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;

        let venta = create(&pool, &req).await.unwrap();
        assert_eq!(venta.venta.consecutivo, "VT-00001");
        assert!(!venta.venta.liquidada);

        let ped = pedido::find_by_consecutivo(
            &pool,
            req.codigo_pedido.as_deref().unwrap(),
            "V01",
        )
        .await
        .unwrap()
        .unwrap();
        assert!(ped.usado);

        let dev = devolucion::find_by_consecutivo(
            &pool,
            req.codigo_dev_dia.as_deref().unwrap(),
            "V01",
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(dev.usos, 1);

        let err = create(&pool, &req).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::SaleExistsForDate, _)
        ));
    }

    #[tokio::test]
    async fn delete_restores_pre_consolidation_state() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;

        let venta = create(&pool, &req).await.unwrap();
        assert!(delete(&pool, venta.venta.id).await.unwrap());

        let ped = pedido::find_by_consecutivo(
            &pool,
            req.codigo_pedido.as_deref().unwrap(),
            "V01",
        )
        .await
        .unwrap()
        .unwrap();
        assert!(!ped.usado);

        let ext = extra::find_by_consecutivo(
            &pool,
            req.codigo_extra.as_deref().unwrap(),
            "V01",
        )
        .await
        .unwrap()
        .unwrap();
        assert!(!ext.usado);

        for codigo in [
            req.codigo_dev_anterior.as_deref().unwrap(),
            req.codigo_dev_dia.as_deref().unwrap(),
        ] {
            let dev = devolucion::find_by_consecutivo(&pool, codigo, "V01")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(dev.usos, 0);
        }

        assert!(items_of(&pool, venta.venta.id).await.unwrap().is_empty());

        // State fully restored: the same consolidation succeeds again
        create(&pool, &req).await.unwrap();
    }

    #[tokio::test]
    async fn exhausted_return_is_rejected_as_source() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;
        let dev_dia = req.codigo_dev_dia.clone().unwrap();

        sqlx::query("UPDATE devoluciones SET usos = 2 WHERE consecutivo = ?")
            .bind(&dev_dia)
            .execute(&pool)
            .await
            .unwrap();

        let err = create(&pool, &req).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::ReturnUsesExhausted, _)
        ));

        // No partial side effects: the pedido was not marked used
        let ped = pedido::find_by_consecutivo(
            &pool,
            req.codigo_pedido.as_deref().unwrap(),
            "V01",
        )
        .await
        .unwrap()
        .unwrap();
        assert!(!ped.usado);
    }

    #[tokio::test]
    async fn settled_venta_cannot_be_deleted() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;
        let venta = create(&pool, &req).await.unwrap();

        sqlx::query("UPDATE ventas SET liquidada = 1 WHERE id = ?")
            .bind(venta.venta.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = delete(&pool, venta.venta.id).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::SaleAlreadySettled, _)
        ));
    }

    #[tokio::test]
    async fn empty_consolidation_rejected() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        let req = VentaRequest {
            fecha: "2025-03-10".into(),
            codigo_vendedor: "V01".into(),
            codigo_dev_anterior: None,
            codigo_pedido: None,
            codigo_extra: None,
            codigo_dev_dia: None,
        };
        let err = breakdown(&pool, &req).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::EmptyConsolidation, _)
        ));
    }
}
