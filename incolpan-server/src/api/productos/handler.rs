//! Product API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::producto;
use crate::utils::{AppError, AppResult};
use shared::models::{Producto, ProductoCreate, ProductoUpdate};

const RESOURCE: &str = "productos";

/// GET /api/productos - active products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Producto>>> {
    let productos = producto::find_all(&state.pool).await?;
    Ok(Json(productos))
}

/// GET /api/productos/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Producto>> {
    let producto = producto::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Producto {id}")))?;
    Ok(Json(producto))
}

/// GET /api/productos/by-codigo/:codigo
pub async fn get_by_codigo(
    State(state): State<ServerState>,
    Path(codigo): Path<String>,
) -> AppResult<Json<Producto>> {
    let producto = producto::find_by_codigo(&state.pool, &codigo)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Producto {codigo}")))?;
    Ok(Json(producto))
}

/// POST /api/productos
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ProductoCreate>,
) -> AppResult<Json<Producto>> {
    let producto = producto::create(&state.pool, data).await?;
    state
        .broadcast_sync(RESOURCE, "created", &producto.id.to_string(), Some(&producto))
        .await;
    Ok(Json(producto))
}

/// PUT /api/productos/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<ProductoUpdate>,
) -> AppResult<Json<Producto>> {
    let producto = producto::update(&state.pool, id, data).await?;
    state
        .broadcast_sync(RESOURCE, "updated", &id.to_string(), Some(&producto))
        .await;
    Ok(Json(producto))
}

/// DELETE /api/productos/:id - soft delete
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<()>> {
    if !producto::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Producto {id}")));
    }
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id.to_string(), None)
        .await;
    Ok(Json(()))
}
