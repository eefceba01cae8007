//! Report API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reportes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/pedidos-por-producto", get(handler::pedidos_por_producto))
        .route("/pedidos-por-dia", get(handler::pedidos_por_dia))
        .route("/pedidos-por-mes", get(handler::pedidos_por_mes))
        .route("/extras-por-producto", get(handler::extras_por_producto))
        .route(
            "/devoluciones-por-producto",
            get(handler::devoluciones_por_producto),
        )
        .route("/ventas-por-producto", get(handler::ventas_por_producto))
}
