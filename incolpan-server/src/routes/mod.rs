//! Router assembly and HTTP middleware

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::sync::router())
        .merge(api::vendedores::router())
        .merge(api::productos::router())
        .merge(api::pedidos::router())
        .merge(api::extras::router())
        .merge(api::devoluciones::router())
        .merge(api::despachos::router())
        .merge(api::ventas::router())
        .merge(api::cambios::router())
        .merge(api::liquidaciones::router())
        .merge(api::canastas::router())
        .merge(api::reportes::router())
}

/// Build the fully configured application with all middleware.
///
/// Used by the HTTP server and by router-level tests.
pub fn build_app(_state: &ServerState) -> Router<ServerState> {
    build_router()
        // CORS - terminals are served from another origin
        .layer(CorsLayer::permissive())
        // Gzip compress responses
        .layer(CompressionLayer::new())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Tag every request with an ID and echo it back
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
}
