//! Settlement (liquidacion) repository
//!
//! A liquidacion settles the day's venta for one seller:
//!
//! ```text
//! valor_a_pagar = (total_venta - comision) - descuento_cambios
//! ```
//!
//! where `descuento_cambios` is the same-day cambio amount (0 when no
//! cambio was registered). Creating a settlement marks the venta
//! `liquidada` in the same transaction; deleting reverses it.

use super::documento::check_fecha;
use super::{RepoError, RepoResult, next_consecutivo};
use shared::ErrorCode;
use shared::models::{
    Liquidacion, LiquidacionCreate, LiquidacionPreview, LiquidacionResumen, LiquidacionUpdate,
    LiquidacionVendedorResumen, Page, PagoTotales, Venta,
};
use sqlx::SqlitePool;

const LIQUIDACION_SELECT: &str = "SELECT id, codigo, fecha, codigo_vendedor, venta_id, valor_venta, valor_comision, descuento_cambios, valor_a_pagar, pago_banco, pago_efectivo, pago_otros, comentarios, usuario_creador, created_at, usuario_modificador, updated_at FROM liquidaciones";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Liquidacion>> {
    let sql = format!("{LIQUIDACION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Liquidacion>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_vendedor_fecha(
    pool: &SqlitePool,
    codigo_vendedor: &str,
    fecha: &str,
) -> RepoResult<Option<Liquidacion>> {
    let sql = format!("{LIQUIDACION_SELECT} WHERE codigo_vendedor = ? AND fecha = ?");
    let row = sqlx::query_as::<_, Liquidacion>(&sql)
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
) -> RepoResult<Page<Liquidacion>> {
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

    let count_sql = format!("SELECT COUNT(*) FROM liquidaciones {where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for v in [desde, hasta, codigo_vendedor].into_iter().flatten() {
        count_query = count_query.bind(v.to_string());
    }
    let total_items = count_query.fetch_one(pool).await?;

    let list_sql =
        format!("{LIQUIDACION_SELECT} {where_sql} ORDER BY fecha DESC, codigo DESC LIMIT ? OFFSET ?");
    let mut list_query = sqlx::query_as::<_, Liquidacion>(&list_sql);
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

/// The unsettled venta for (vendedor, fecha), or the corresponding rule
/// error.
async fn pending_venta(
    pool: &SqlitePool,
    codigo_vendedor: &str,
    fecha: &str,
) -> RepoResult<Venta> {
    let venta = super::venta::find_by_vendedor_fecha(pool, codigo_vendedor, fecha)
        .await?
        .filter(|v| !v.liquidada)
        .ok_or_else(|| RepoError::rule(ErrorCode::NoPendingSale))?;
    Ok(venta)
}

/// Same-day cambio amount, 0 when none was registered
async fn descuento_cambios(
    pool: &SqlitePool,
    codigo_vendedor: &str,
    fecha: &str,
) -> RepoResult<f64> {
    Ok(super::cambio::find_by_vendedor_fecha(pool, codigo_vendedor, fecha)
        .await?
        .map(|c| c.valor_cambio)
        .unwrap_or(0.0))
}

/// What a settlement for (vendedor, fecha) would look like
pub async fn preview(
    pool: &SqlitePool,
    codigo_vendedor: &str,
    fecha: &str,
) -> RepoResult<LiquidacionPreview> {
    check_fecha(fecha)?;
    let venta = pending_venta(pool, codigo_vendedor, fecha).await?;
    let descuento = descuento_cambios(pool, codigo_vendedor, fecha).await?;
    let valor_a_pagar = (venta.total_venta - venta.comision) - descuento;
    Ok(LiquidacionPreview {
        venta,
        descuento_cambios: descuento,
        valor_a_pagar,
    })
}

pub async fn create(pool: &SqlitePool, data: LiquidacionCreate) -> RepoResult<Liquidacion> {
    check_fecha(&data.fecha)?;
    if find_by_vendedor_fecha(pool, &data.codigo_vendedor, &data.fecha)
        .await?
        .is_some()
    {
        return Err(RepoError::rule(ErrorCode::SettlementExistsForDate));
    }

    let venta = pending_venta(pool, &data.codigo_vendedor, &data.fecha).await?;
    let descuento = descuento_cambios(pool, &data.codigo_vendedor, &data.fecha).await?;
    let valor_a_pagar = (venta.total_venta - venta.comision) - descuento;

    let codigo = next_consecutivo(pool, "liquidaciones", "codigo", "LQ").await?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO liquidaciones (id, codigo, fecha, codigo_vendedor, venta_id, valor_venta, valor_comision, descuento_cambios, valor_a_pagar, pago_banco, pago_efectivo, pago_otros, comentarios, usuario_creador, created_at, usuario_modificador, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?)",
    )
    .bind(id)
    .bind(&codigo)
    .bind(&data.fecha)
    .bind(&data.codigo_vendedor)
    .bind(venta.id)
    .bind(venta.total_venta)
    .bind(venta.comision)
    .bind(descuento)
    .bind(valor_a_pagar)
    .bind(data.pago_banco)
    .bind(data.pago_efectivo)
    .bind(data.pago_otros)
    .bind(&data.comentarios)
    .bind(&data.usuario_creador)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    super::venta::set_liquidada(&mut tx, venta.id, true).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create liquidacion".into()))
}

/// Replace the payment split/comments and recompute the derived amounts
/// from the venta and the current same-day cambio.
pub async fn update(pool: &SqlitePool, id: i64, data: LiquidacionUpdate) -> RepoResult<Liquidacion> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Liquidacion {id}")))?;

    let venta = super::venta::find_by_id(pool, current.venta_id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Venta {} missing", current.venta_id)))?;
    let descuento = descuento_cambios(pool, &current.codigo_vendedor, &current.fecha).await?;
    let valor_a_pagar = (venta.total_venta - venta.comision) - descuento;

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE liquidaciones SET valor_venta = ?, valor_comision = ?, descuento_cambios = ?, valor_a_pagar = ?, pago_banco = COALESCE(?, pago_banco), pago_efectivo = COALESCE(?, pago_efectivo), pago_otros = COALESCE(?, pago_otros), comentarios = COALESCE(?, comentarios), usuario_modificador = ?, updated_at = ? WHERE id = ?",
    )
    .bind(venta.total_venta)
    .bind(venta.comision)
    .bind(descuento)
    .bind(valor_a_pagar)
    .bind(data.pago_banco)
    .bind(data.pago_efectivo)
    .bind(data.pago_otros)
    .bind(&data.comentarios)
    .bind(&data.usuario_modificador)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Liquidacion {id}")))
}

/// Delete a settlement, releasing its venta back to pending
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let Some(current) = find_by_id(pool, id).await? else {
        return Ok(false);
    };

    let mut tx = pool.begin().await?;
    super::venta::set_liquidada(&mut tx, current.venta_id, false).await?;
    sqlx::query("DELETE FROM liquidaciones WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(true)
}

/// Settlement summary over a date range: per-seller totals plus
/// payment-method totals.
pub async fn resumen(pool: &SqlitePool, desde: &str, hasta: &str) -> RepoResult<LiquidacionResumen> {
    check_fecha(desde)?;
    check_fecha(hasta)?;

    let por_vendedor = sqlx::query_as::<_, LiquidacionVendedorResumen>(
        "SELECT l.codigo_vendedor, v.nombre AS nombre_vendedor, \
                SUM(l.valor_venta) AS total_ventas, \
                SUM(l.valor_venta - l.valor_comision) AS total_pagar_pan, \
                SUM(l.pago_banco + l.pago_efectivo + l.pago_otros) AS total_pagado \
         FROM liquidaciones l JOIN vendedores v ON v.codigo_vendedor = l.codigo_vendedor \
         WHERE l.fecha >= ? AND l.fecha <= ? \
         GROUP BY l.codigo_vendedor, v.nombre ORDER BY v.nombre",
    )
    .bind(desde)
    .bind(hasta)
    .fetch_all(pool)
    .await?;

    let pagos = sqlx::query_as::<_, PagoTotales>(
        "SELECT COALESCE(SUM(pago_banco), 0) AS banco, COALESCE(SUM(pago_efectivo), 0) AS efectivo, COALESCE(SUM(pago_otros), 0) AS otros \
         FROM liquidaciones WHERE fecha >= ? AND fecha <= ?",
    )
    .bind(desde)
    .bind(hasta)
    .fetch_one(pool)
    .await?;

    Ok(LiquidacionResumen {
        desde: desde.to_string(),
        hasta: hasta.to_string(),
        por_vendedor,
        pagos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::venta::tests::seed_full_day;
    use crate::db::repository::{cambio, venta};
    use crate::db::test_pool;

    fn payload() -> LiquidacionCreate {
        LiquidacionCreate {
            fecha: "2025-03-10".into(),
            codigo_vendedor: "V01".into(),
            pago_banco: 10_000.0,
            pago_efectivo: 3000.0,
            pago_otros: 0.0,
            comentarios: None,
            usuario_creador: "admin".into(),
        }
    }

    #[tokio::test]
    async fn create_discounts_same_day_cambio_and_settles_venta() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;
        let created = venta::create(&pool, &req).await.unwrap();
        cambio::create(&pool, cambio::tests::payload("2025-03-10", 2000.0))
            .await
            .unwrap();

        let liq = create(&pool, payload()).await.unwrap();
        assert_eq!(liq.codigo, "LQ-00001");
        assert_eq!(liq.descuento_cambios, 2000.0);
        // (17000 - 1800) - 2000
        assert!((liq.valor_a_pagar - 13_200.0).abs() < 1e-9);

        let settled = venta::find_by_id(&pool, created.venta.id)
            .await
            .unwrap()
            .unwrap();
        assert!(settled.liquidada);
    }

    #[tokio::test]
    async fn requires_pending_venta_and_guards_duplicates() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;

        // No venta yet
        let err = create(&pool, payload()).await.unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::NoPendingSale, _)));

        venta::create(&pool, &req).await.unwrap();
        create(&pool, payload()).await.unwrap();

        // Venta is now settled, and the pair also has a settlement
        let err = create(&pool, payload()).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::SettlementExistsForDate, _)
        ));
    }

    #[tokio::test]
    async fn preview_without_cambio_uses_zero_discount() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;
        venta::create(&pool, &req).await.unwrap();

        let preview = preview(&pool, "V01", "2025-03-10").await.unwrap();
        assert_eq!(preview.descuento_cambios, 0.0);
        assert!((preview.valor_a_pagar - 15_200.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn delete_releases_the_venta() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;
        let created = venta::create(&pool, &req).await.unwrap();
        let liq = create(&pool, payload()).await.unwrap();

        assert!(delete(&pool, liq.id).await.unwrap());
        let released = venta::find_by_id(&pool, created.venta.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!released.liquidada);
    }

    #[tokio::test]
    async fn resumen_aggregates_by_vendedor_and_payment_method() {
        let pool = test_pool().await;
        let req = seed_full_day(&pool).await;
        venta::create(&pool, &req).await.unwrap();
        create(&pool, payload()).await.unwrap();

        let resumen = resumen(&pool, "2025-03-01", "2025-03-31").await.unwrap();
        assert_eq!(resumen.por_vendedor.len(), 1);
        assert_eq!(resumen.por_vendedor[0].codigo_vendedor, "V01");
        assert_eq!(resumen.por_vendedor[0].total_ventas, 17_000.0);
        assert_eq!(resumen.pagos.banco, 10_000.0);
        assert_eq!(resumen.pagos.efectivo, 3000.0);
        assert_eq!(resumen.pagos.otros, 0.0);
    }
}
