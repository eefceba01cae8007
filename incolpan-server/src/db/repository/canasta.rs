//! Crate (canasta) and movement ledger repository
//!
//! The ledger is append-only. A crate's `actualidad` is derived from
//! its latest movement: salida -> prestada, entrada -> disponible. The
//! validation rules keep the ledger coherent:
//!
//! - entrada with no prior movement is rejected
//! - entrada by a different seller than the last movement is rejected
//! - salida while the crate is already prestada is rejected
//! - entrada while the crate is disponible is rejected

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{
    ACTUALIDAD_DISPONIBLE, ACTUALIDAD_PRESTADA, Canasta, CanastaCreate, CanastaDetalle,
    CanastaVencida, CanastasVendedorDia, InventarioCanastas, MOVIMIENTO_ENTRADA,
    MOVIMIENTO_SALIDA, MovimientoCanasta, MovimientoCreate, Page, PrestadaDetalle,
    PrestadasResumen,
};
use sqlx::SqlitePool;

/// Crates loaned longer than this many days count as overdue
pub const DIAS_VENCIMIENTO: i64 = 7;

const MS_PER_DAY: i64 = 86_400_000;

const CANASTA_SELECT: &str = "SELECT codigo_barras, tamano, color, estado, fecha_registro, actualidad FROM canastas";
const MOVIMIENTO_SELECT: &str = "SELECT id, codigo_vendedor, tipo_movimiento, codigo_barras, fecha_movimiento FROM movimientos_canasta";

pub async fn find_by_codigo(pool: &SqlitePool, codigo_barras: &str) -> RepoResult<Option<Canasta>> {
    let sql = format!("{CANASTA_SELECT} WHERE codigo_barras = ?");
    let row = sqlx::query_as::<_, Canasta>(&sql)
        .bind(codigo_barras)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list(pool: &SqlitePool, page: u32, per_page: u32) -> RepoResult<Page<Canasta>> {
    let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM canastas")
        .fetch_one(pool)
        .await?;
    let sql = format!("{CANASTA_SELECT} ORDER BY fecha_registro DESC LIMIT ? OFFSET ?");
    let items = sqlx::query_as::<_, Canasta>(&sql)
        .bind(per_page as i64)
        .bind(super::page_offset(page, per_page))
        .fetch_all(pool)
        .await?;
    Ok(Page::new(items, page, per_page, total_items))
}

pub async fn create(pool: &SqlitePool, data: CanastaCreate) -> RepoResult<Canasta> {
    if data.codigo_barras.trim().is_empty() {
        return Err(RepoError::Validation("codigo_barras is required".into()));
    }
    if find_by_codigo(pool, &data.codigo_barras).await?.is_some() {
        return Err(RepoError::rule(ErrorCode::CrateExists));
    }

    sqlx::query(
        "INSERT INTO canastas (codigo_barras, tamano, color, estado, fecha_registro, actualidad) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&data.codigo_barras)
    .bind(&data.tamano)
    .bind(&data.color)
    .bind(&data.estado)
    .bind(shared::util::now_millis())
    .bind(ACTUALIDAD_DISPONIBLE)
    .execute(pool)
    .await?;

    find_by_codigo(pool, &data.codigo_barras)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create canasta".into()))
}

/// Crate with its most recent movements (limit 30)
pub async fn detail(pool: &SqlitePool, codigo_barras: &str) -> RepoResult<Option<CanastaDetalle>> {
    let Some(canasta) = find_by_codigo(pool, codigo_barras).await? else {
        return Ok(None);
    };
    let sql = format!(
        "{MOVIMIENTO_SELECT} WHERE codigo_barras = ? ORDER BY fecha_movimiento DESC, id DESC LIMIT 30"
    );
    let movimientos = sqlx::query_as::<_, MovimientoCanasta>(&sql)
        .bind(codigo_barras)
        .fetch_all(pool)
        .await?;
    Ok(Some(CanastaDetalle {
        canasta,
        movimientos,
    }))
}

async fn last_movement(
    pool: &SqlitePool,
    codigo_barras: &str,
) -> RepoResult<Option<MovimientoCanasta>> {
    let sql = format!(
        "{MOVIMIENTO_SELECT} WHERE codigo_barras = ? ORDER BY fecha_movimiento DESC, id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, MovimientoCanasta>(&sql)
        .bind(codigo_barras)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Append a ledger entry and derive the crate's new state.
pub async fn record_movement(
    pool: &SqlitePool,
    data: MovimientoCreate,
) -> RepoResult<MovimientoCanasta> {
    if super::vendedor::find_by_codigo(pool, &data.codigo_vendedor)
        .await?
        .is_none()
    {
        return Err(RepoError::rule(ErrorCode::SellerNotFound));
    }
    let canasta = find_by_codigo(pool, &data.codigo_barras)
        .await?
        .ok_or_else(|| RepoError::rule(ErrorCode::CrateNotFound))?;

    let last = last_movement(pool, &data.codigo_barras).await?;

    let nueva_actualidad = match data.tipo_movimiento.as_str() {
        MOVIMIENTO_SALIDA => {
            if canasta.actualidad == ACTUALIDAD_PRESTADA {
                return Err(RepoError::rule(ErrorCode::CrateAlreadyLoaned));
            }
            ACTUALIDAD_PRESTADA
        }
        MOVIMIENTO_ENTRADA => {
            let last = last.as_ref().ok_or_else(|| {
                RepoError::Rule(
                    ErrorCode::CrateNotLoaned,
                    format!("Canasta {} has no movements", data.codigo_barras),
                )
            })?;
            if canasta.actualidad == ACTUALIDAD_DISPONIBLE {
                return Err(RepoError::rule(ErrorCode::CrateNotLoaned));
            }
            if last.codigo_vendedor != data.codigo_vendedor {
                return Err(RepoError::Rule(
                    ErrorCode::CrateLoanedToOther,
                    format!(
                        "Canasta {} was loaned to {}",
                        data.codigo_barras, last.codigo_vendedor
                    ),
                ));
            }
            ACTUALIDAD_DISPONIBLE
        }
        other => {
            return Err(RepoError::Validation(format!(
                "Unknown tipo_movimiento: {other}"
            )));
        }
    };

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO movimientos_canasta (id, codigo_vendedor, tipo_movimiento, codigo_barras, fecha_movimiento) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.codigo_vendedor)
    .bind(&data.tipo_movimiento)
    .bind(&data.codigo_barras)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    sqlx::query("UPDATE canastas SET actualidad = ? WHERE codigo_barras = ?")
        .bind(nueva_actualidad)
        .bind(&data.codigo_barras)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    let sql = format!("{MOVIMIENTO_SELECT} WHERE id = ?");
    sqlx::query_as::<_, MovimientoCanasta>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record movement".into()))
}

/// Most recent movements across all crates (limit 100)
pub async fn recent_movements(pool: &SqlitePool) -> RepoResult<Vec<MovimientoCanasta>> {
    let sql = format!("{MOVIMIENTO_SELECT} ORDER BY fecha_movimiento DESC, id DESC LIMIT 100");
    let rows = sqlx::query_as::<_, MovimientoCanasta>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Movements whose timestamp falls within [desde, hasta] (UTC millis)
pub async fn movements_between(
    pool: &SqlitePool,
    desde: i64,
    hasta: i64,
) -> RepoResult<Vec<MovimientoCanasta>> {
    let sql = format!(
        "{MOVIMIENTO_SELECT} WHERE fecha_movimiento >= ? AND fecha_movimiento <= ? ORDER BY fecha_movimiento DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, MovimientoCanasta>(&sql)
        .bind(desde)
        .bind(hasta)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Inventory grouped by size and color with per-state counts
pub async fn inventario(pool: &SqlitePool) -> RepoResult<Vec<InventarioCanastas>> {
    let rows = sqlx::query_as::<_, InventarioCanastas>(
        "SELECT tamano, color, \
                SUM(CASE WHEN actualidad = 'disponible' THEN 1 ELSE 0 END) AS disponibles, \
                SUM(CASE WHEN actualidad = 'prestada' THEN 1 ELSE 0 END) AS prestadas, \
                COUNT(*) AS total \
         FROM canastas GROUP BY tamano, color ORDER BY tamano, color",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-seller salida/entrada counts for one calendar day [desde, hasta)
pub async fn por_vendedor_dia(
    pool: &SqlitePool,
    desde: i64,
    hasta: i64,
) -> RepoResult<Vec<CanastasVendedorDia>> {
    let rows = sqlx::query_as::<_, CanastasVendedorDia>(
        "SELECT codigo_vendedor, \
                SUM(CASE WHEN tipo_movimiento = 'salida' THEN 1 ELSE 0 END) AS salidas, \
                SUM(CASE WHEN tipo_movimiento = 'entrada' THEN 1 ELSE 0 END) AS entradas \
         FROM movimientos_canasta WHERE fecha_movimiento >= ? AND fecha_movimiento < ? \
         GROUP BY codigo_vendedor ORDER BY codigo_vendedor",
    )
    .bind(desde)
    .bind(hasta)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Last salida per crate. `actualidad` decides which crates are out;
/// this only attributes the seller and timestamp of the open loan.
const ULTIMA_SALIDA: &str = "SELECT codigo_barras, codigo_vendedor, MAX(fecha_movimiento) AS fecha_salida \
     FROM movimientos_canasta WHERE tipo_movimiento = 'salida' GROUP BY codigo_barras";

/// How many crates each seller currently holds
pub async fn prestadas_resumen(pool: &SqlitePool) -> RepoResult<Vec<PrestadasResumen>> {
    let sql = format!(
        "SELECT s.codigo_vendedor, COUNT(*) AS cantidad \
         FROM ({ULTIMA_SALIDA}) s JOIN canastas c ON c.codigo_barras = s.codigo_barras \
         WHERE c.actualidad = 'prestada' GROUP BY s.codigo_vendedor ORDER BY cantidad DESC"
    );
    let rows = sqlx::query_as::<_, PrestadasResumen>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// The crates a seller currently holds, with the salida timestamp
pub async fn prestadas_de(
    pool: &SqlitePool,
    codigo_vendedor: &str,
) -> RepoResult<Vec<PrestadaDetalle>> {
    let sql = format!(
        "SELECT c.codigo_barras, c.tamano, c.color, s.fecha_salida \
         FROM ({ULTIMA_SALIDA}) s JOIN canastas c ON c.codigo_barras = s.codigo_barras \
         WHERE c.actualidad = 'prestada' AND s.codigo_vendedor = ? ORDER BY s.fecha_salida"
    );
    let rows = sqlx::query_as::<_, PrestadaDetalle>(&sql)
        .bind(codigo_vendedor)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Crates loaned out longer than [`DIAS_VENCIMIENTO`] days
pub async fn vencidas(pool: &SqlitePool) -> RepoResult<Vec<CanastaVencida>> {
    let now = shared::util::now_millis();
    let limite = now - DIAS_VENCIMIENTO * MS_PER_DAY;
    let sql = format!(
        "SELECT s.codigo_barras, s.codigo_vendedor, s.fecha_salida, \
                (? - s.fecha_salida) / {MS_PER_DAY} AS dias_fuera \
         FROM ({ULTIMA_SALIDA}) s JOIN canastas c ON c.codigo_barras = s.codigo_barras \
         WHERE c.actualidad = 'prestada' AND s.fecha_salida < ? \
         ORDER BY s.fecha_salida"
    );
    let rows = sqlx::query_as::<_, CanastaVencida>(&sql)
        .bind(now)
        .bind(limite)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::pedido::tests::seed_catalog;
    use crate::db::repository::vendedor;
    use crate::db::test_pool;
    use shared::models::VendedorCreate;

    async fn seed_canasta(pool: &SqlitePool, codigo: &str) {
        create(
            pool,
            CanastaCreate {
                codigo_barras: codigo.into(),
                tamano: "grande".into(),
                color: "rojo".into(),
                estado: "buena".into(),
            },
        )
        .await
        .unwrap();
    }

    fn movimiento(vendedor: &str, tipo: &str, codigo: &str) -> MovimientoCreate {
        MovimientoCreate {
            codigo_vendedor: vendedor.into(),
            tipo_movimiento: tipo.into(),
            codigo_barras: codigo.into(),
        }
    }

    #[tokio::test]
    async fn salida_entrada_cycle_derives_state() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        seed_canasta(&pool, "C-001").await;

        record_movement(&pool, movimiento("V01", "salida", "C-001"))
            .await
            .unwrap();
        let canasta = find_by_codigo(&pool, "C-001").await.unwrap().unwrap();
        assert_eq!(canasta.actualidad, ACTUALIDAD_PRESTADA);

        record_movement(&pool, movimiento("V01", "entrada", "C-001"))
            .await
            .unwrap();
        let canasta = find_by_codigo(&pool, "C-001").await.unwrap().unwrap();
        assert_eq!(canasta.actualidad, ACTUALIDAD_DISPONIBLE);
    }

    #[tokio::test]
    async fn invalid_sequences_are_rejected() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        vendedor::create(
            &pool,
            VendedorCreate {
                codigo_vendedor: "V02".into(),
                nombre: "Ana".into(),
                rol: "vendedor".into(),
                comision_panaderia: 0.0,
                comision_bizcocheria: 0.0,
            },
        )
        .await
        .unwrap();
        seed_canasta(&pool, "C-001").await;

        // entrada with no prior movement
        let err = record_movement(&pool, movimiento("V01", "entrada", "C-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::CrateNotLoaned, _)));

        record_movement(&pool, movimiento("V01", "salida", "C-001"))
            .await
            .unwrap();

        // double salida
        let err = record_movement(&pool, movimiento("V01", "salida", "C-001"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::CrateAlreadyLoaned, _)
        ));

        // entrada by the wrong seller
        let err = record_movement(&pool, movimiento("V02", "entrada", "C-001"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Rule(ErrorCode::CrateLoanedToOther, _)
        ));

        // the right seller can return it
        record_movement(&pool, movimiento("V01", "entrada", "C-001"))
            .await
            .unwrap();

        // entrada while disponible
        let err = record_movement(&pool, movimiento("V01", "entrada", "C-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::CrateNotLoaned, _)));
    }

    #[tokio::test]
    async fn duplicate_barcode_rejected() {
        let pool = test_pool().await;
        seed_canasta(&pool, "C-001").await;
        let err = create(
            &pool,
            CanastaCreate {
                codigo_barras: "C-001".into(),
                tamano: "chica".into(),
                color: "azul".into(),
                estado: "buena".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Rule(ErrorCode::CrateExists, _)));
    }

    #[tokio::test]
    async fn prestadas_queries_follow_latest_movement() {
        let pool = test_pool().await;
        seed_catalog(&pool).await;
        seed_canasta(&pool, "C-001").await;
        seed_canasta(&pool, "C-002").await;

        record_movement(&pool, movimiento("V01", "salida", "C-001"))
            .await
            .unwrap();
        record_movement(&pool, movimiento("V01", "salida", "C-002"))
            .await
            .unwrap();
        record_movement(&pool, movimiento("V01", "entrada", "C-002"))
            .await
            .unwrap();

        let resumen = prestadas_resumen(&pool).await.unwrap();
        assert_eq!(resumen.len(), 1);
        assert_eq!(resumen[0].cantidad, 1);

        let detalle = prestadas_de(&pool, "V01").await.unwrap();
        assert_eq!(detalle.len(), 1);
        assert_eq!(detalle[0].codigo_barras, "C-001");

        let inv = inventario(&pool).await.unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].disponibles, 1);
        assert_eq!(inv[0].prestadas, 1);
        assert_eq!(inv[0].total, 2);
    }
}
