//! Seller API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::vendedor;
use crate::utils::{AppError, AppResult};
use shared::models::{Vendedor, VendedorCreate, VendedorUpdate};

const RESOURCE: &str = "vendedores";

/// GET /api/vendedores - active sellers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Vendedor>>> {
    let vendedores = vendedor::find_all(&state.pool).await?;
    Ok(Json(vendedores))
}

/// GET /api/vendedores/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vendedor>> {
    let vendedor = vendedor::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendedor {id}")))?;
    Ok(Json(vendedor))
}

/// GET /api/vendedores/by-codigo/:codigo
pub async fn get_by_codigo(
    State(state): State<ServerState>,
    Path(codigo): Path<String>,
) -> AppResult<Json<Vendedor>> {
    let vendedor = vendedor::find_by_codigo(&state.pool, &codigo)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendedor {codigo}")))?;
    Ok(Json(vendedor))
}

/// POST /api/vendedores
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<VendedorCreate>,
) -> AppResult<Json<Vendedor>> {
    let vendedor = vendedor::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE, "created", &vendedor.id.to_string(), Some(&vendedor))
        .await;
    Ok(Json(vendedor))
}

/// PUT /api/vendedores/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<VendedorUpdate>,
) -> AppResult<Json<Vendedor>> {
    let vendedor = vendedor::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&vendedor))
        .await;
    Ok(Json(vendedor))
}

/// DELETE /api/vendedores/:id - soft delete
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !vendedor::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Vendedor {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
