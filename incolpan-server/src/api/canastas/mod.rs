//! Crate (canasta) ledger API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/canastas", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/movimientos",
            get(handler::recent_movements).post(handler::record_movement),
        )
        .route("/movimientos/rango", get(handler::movements_between))
        .route("/inventario", get(handler::inventario))
        .route("/por-vendedor-dia", get(handler::por_vendedor_dia))
        .route("/prestadas", get(handler::prestadas_resumen))
        .route("/prestadas/{codigo_vendedor}", get(handler::prestadas_de))
        .route("/vencidas", get(handler::vencidas))
        .route("/{codigo_barras}", get(handler::get_by_codigo))
}
