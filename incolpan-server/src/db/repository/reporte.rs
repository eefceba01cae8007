//! Report queries
//!
//! Every report is a flat row set; the frontend renders them. Net values
//! discount the seller's category commission from the gross line value.

use super::documento::check_fecha;
use super::RepoResult;
use shared::models::{
    DashboardResumen, DiaVendedorRow, DocumentoDiaTotales, MesVendedorRow, ProductoReporteRow,
};
use sqlx::SqlitePool;

/// `categoria -> commission pct` lookup, inline so each row applies the
/// right rate without a second query.
const COMISION_PCT: &str = "CASE pr.categoria \
     WHEN 'panaderia' THEN v.comision_panaderia \
     WHEN 'bizcocheria' THEN v.comision_bizcocheria \
     ELSE 0 END";

async fn documento_por_producto(
    pool: &SqlitePool,
    header_table: &str,
    items_table: &str,
    desde: &str,
    hasta: &str,
) -> RepoResult<Vec<ProductoReporteRow>> {
    check_fecha(desde)?;
    check_fecha(hasta)?;
    let sql = format!(
        "SELECT d.fecha, d.codigo_vendedor, v.nombre AS nombre_vendedor, \
                i.producto_cod, pr.nombre AS nombre_producto, \
                CAST(i.cantidad AS INTEGER) AS cantidad, \
                i.subtotal AS valor_bruto, \
                i.subtotal * (1.0 - ({COMISION_PCT}) / 100.0) AS valor_neto \
         FROM {header_table} d \
         JOIN {items_table} i ON i.doc_id = d.id \
         JOIN vendedores v ON v.codigo_vendedor = d.codigo_vendedor \
         JOIN productos pr ON pr.codigo = i.producto_cod \
         WHERE d.fecha >= ? AND d.fecha <= ? \
         ORDER BY d.fecha, d.codigo_vendedor, i.producto_cod"
    );
    let rows = sqlx::query_as::<_, ProductoReporteRow>(&sql)
        .bind(desde)
        .bind(hasta)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn pedidos_por_producto(
    pool: &SqlitePool,
    desde: &str,
    hasta: &str,
) -> RepoResult<Vec<ProductoReporteRow>> {
    documento_por_producto(pool, "pedidos", "pedido_items", desde, hasta).await
}

pub async fn extras_por_producto(
    pool: &SqlitePool,
    desde: &str,
    hasta: &str,
) -> RepoResult<Vec<ProductoReporteRow>> {
    documento_por_producto(pool, "extras", "extra_items", desde, hasta).await
}

pub async fn devoluciones_por_producto(
    pool: &SqlitePool,
    desde: &str,
    hasta: &str,
) -> RepoResult<Vec<ProductoReporteRow>> {
    documento_por_producto(pool, "devoluciones", "devolucion_items", desde, hasta).await
}

/// Consolidated sales lines already carry their net split, so this reads
/// it back instead of recomputing.
pub async fn ventas_por_producto(
    pool: &SqlitePool,
    desde: &str,
    hasta: &str,
) -> RepoResult<Vec<ProductoReporteRow>> {
    check_fecha(desde)?;
    check_fecha(hasta)?;
    let rows = sqlx::query_as::<_, ProductoReporteRow>(
        "SELECT s.fecha, s.codigo_vendedor, v.nombre AS nombre_vendedor, \
                i.producto_cod, pr.nombre AS nombre_producto, \
                CAST(i.cantidad AS INTEGER) AS cantidad, \
                i.subtotal AS valor_bruto, i.pagar_pan AS valor_neto \
         FROM ventas s \
         JOIN venta_items i ON i.venta_id = s.id \
         JOIN vendedores v ON v.codigo_vendedor = s.codigo_vendedor \
         JOIN productos pr ON pr.codigo = i.producto_cod \
         WHERE s.fecha >= ? AND s.fecha <= ? \
         ORDER BY s.fecha, s.codigo_vendedor, i.producto_cod",
    )
    .bind(desde)
    .bind(hasta)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Order totals per day per seller
pub async fn pedidos_por_dia(
    pool: &SqlitePool,
    desde: &str,
    hasta: &str,
) -> RepoResult<Vec<DiaVendedorRow>> {
    check_fecha(desde)?;
    check_fecha(hasta)?;
    let rows = sqlx::query_as::<_, DiaVendedorRow>(
        "SELECT d.fecha, d.codigo_vendedor, v.nombre AS nombre_vendedor, \
                CAST(COALESCE(SUM(i.cantidad), 0) AS INTEGER) AS cantidad, \
                COALESCE(SUM(i.subtotal), 0) AS valor \
         FROM pedidos d \
         JOIN pedido_items i ON i.doc_id = d.id \
         JOIN vendedores v ON v.codigo_vendedor = d.codigo_vendedor \
         WHERE d.fecha >= ? AND d.fecha <= ? \
         GROUP BY d.fecha, d.codigo_vendedor \
         ORDER BY d.fecha, d.codigo_vendedor",
    )
    .bind(desde)
    .bind(hasta)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Order totals per calendar month per seller
pub async fn pedidos_por_mes(
    pool: &SqlitePool,
    desde: &str,
    hasta: &str,
) -> RepoResult<Vec<MesVendedorRow>> {
    check_fecha(desde)?;
    check_fecha(hasta)?;
    let rows = sqlx::query_as::<_, MesVendedorRow>(
        "SELECT strftime('%Y-%m', d.fecha) AS mes, d.codigo_vendedor, \
                v.nombre AS nombre_vendedor, \
                CAST(COALESCE(SUM(i.cantidad), 0) AS INTEGER) AS cantidad, \
                COALESCE(SUM(i.subtotal), 0) AS valor \
         FROM pedidos d \
         JOIN pedido_items i ON i.doc_id = d.id \
         JOIN vendedores v ON v.codigo_vendedor = d.codigo_vendedor \
         WHERE d.fecha >= ? AND d.fecha <= ? \
         GROUP BY mes, d.codigo_vendedor \
         ORDER BY mes, d.codigo_vendedor",
    )
    .bind(desde)
    .bind(hasta)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn documento_dia_totales(
    pool: &SqlitePool,
    header_table: &str,
    items_table: &str,
    fecha: &str,
) -> RepoResult<DocumentoDiaTotales> {
    let sql = format!(
        "SELECT COUNT(DISTINCT d.id) AS documentos, \
                CAST(COALESCE(SUM(i.cantidad), 0) AS INTEGER) AS unidades, \
                COALESCE(SUM(i.subtotal), 0) AS valor \
         FROM {header_table} d \
         JOIN {items_table} i ON i.doc_id = d.id \
         WHERE d.fecha = ?"
    );
    let totales = sqlx::query_as::<_, DocumentoDiaTotales>(&sql)
        .bind(fecha)
        .fetch_one(pool)
        .await?;
    Ok(totales)
}

/// Admin dashboard: the month's consolidated sales plus the day's order
/// and extra totals.
pub async fn dashboard(pool: &SqlitePool, fecha: &str) -> RepoResult<DashboardResumen> {
    check_fecha(fecha)?;
    let mes = fecha[..7].to_string();

    let ventas_mes: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_venta), 0) FROM ventas WHERE strftime('%Y-%m', fecha) = ?",
    )
    .bind(&mes)
    .fetch_one(pool)
    .await?;

    let pedidos_dia = documento_dia_totales(pool, "pedidos", "pedido_items", fecha).await?;
    let extras_dia = documento_dia_totales(pool, "extras", "extra_items", fecha).await?;

    Ok(DashboardResumen {
        fecha: fecha.to_string(),
        mes,
        ventas_mes,
        pedidos_dia,
        extras_dia,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::pedido::{self, tests::seed_catalog};
    use crate::db::test_pool;
    use shared::models::{DocumentoItemCreate, PedidoCreate};

    fn item(cod: &str, cantidad: i32) -> DocumentoItemCreate {
        DocumentoItemCreate {
            producto_cod: cod.into(),
            cantidad,
        }
    }

    async fn seed_pedidos(pool: &sqlx::SqlitePool) {
        for (fecha, items) in [
            ("2025-03-10", vec![item("P001", 10), item("B001", 2)]),
            ("2025-04-02", vec![item("P001", 4)]),
        ] {
            pedido::create(
                pool,
                PedidoCreate {
                    codigo_vendedor: "V01".into(),
                    fecha: fecha.into(),
                    comentarios: None,
                    items,
                },
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn por_producto_discounts_category_commission() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        seed_pedidos(&pool).await;

        let rows = pedidos_por_producto(&pool, "2025-03-01", "2025-03-31")
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);

        // B001 sorts before P001; 2 x 5000 at 12% -> 8800 net
        assert_eq!(rows[0].producto_cod, "B001");
        assert_eq!(rows[0].cantidad, 2);
        assert_eq!(rows[0].valor_bruto, 10_000.0);
        assert!((rows[0].valor_neto - 8800.0).abs() < 1e-6);

        // 10 x 1000 at 10% -> 9000 net
        assert_eq!(rows[1].producto_cod, "P001");
        assert_eq!(rows[1].valor_bruto, 10_000.0);
        assert!((rows[1].valor_neto - 9000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn dashboard_sums_month_sales_and_day_documents() {
        let pool = test_pool().await;
        let req = crate::db::repository::venta::tests::seed_full_day(&pool).await;
        crate::db::repository::venta::create(&pool, &req).await.unwrap();

        let resumen = dashboard(&pool, "2025-03-10").await.unwrap();
        assert_eq!(resumen.mes, "2025-03");
        // P001 nets 2+8+5-3 = 12 at 1000, B001 nets 2-1 = 1 at 5000
        assert_eq!(resumen.ventas_mes, 17_000.0);
        assert_eq!(resumen.pedidos_dia.documentos, 1);
        assert_eq!(resumen.pedidos_dia.unidades, 12);
        assert_eq!(resumen.pedidos_dia.valor, 20_000.0);
        assert_eq!(resumen.extras_dia.documentos, 1);
        assert_eq!(resumen.extras_dia.unidades, 5);
        assert_eq!(resumen.extras_dia.valor, 5000.0);
    }

    #[tokio::test]
    async fn daily_and_monthly_totals_aggregate() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        seed_pedidos(&pool).await;

        let dias = pedidos_por_dia(&pool, "2025-03-01", "2025-04-30")
            .await
            .unwrap();
        assert_eq!(dias.len(), 2);
        assert_eq!(dias[0].fecha, "2025-03-10");
        assert_eq!(dias[0].cantidad, 12);
        assert_eq!(dias[0].valor, 20_000.0);
        assert_eq!(dias[1].cantidad, 4);
        assert_eq!(dias[1].valor, 4000.0);

        let meses = pedidos_por_mes(&pool, "2025-03-01", "2025-04-30")
            .await
            .unwrap();
        assert_eq!(meses.len(), 2);
        assert_eq!(meses[0].mes, "2025-03");
        assert_eq!(meses[1].mes, "2025-04");
        assert_eq!(meses[1].valor, 4000.0);
    }
}
