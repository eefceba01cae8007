//! API route modules
//!
//! One module per resource, each exposing a `router()` that the routes
//! module merges into the application:
//!
//! - [`health`] - health check
//! - [`sync`] - sync status + WebSocket push channel
//! - [`vendedores`] / [`productos`] - catalog
//! - [`pedidos`] / [`extras`] / [`devoluciones`] - daily documents
//! - [`despachos`] - dispatch slips
//! - [`ventas`] - consolidated daily sales
//! - [`cambios`] / [`liquidaciones`] - settlements
//! - [`canastas`] - crate loan ledger
//! - [`reportes`] - report rows

pub mod health;
pub mod sync;

pub mod productos;
pub mod vendedores;

pub mod devoluciones;
pub mod extras;
pub mod pedidos;

pub mod despachos;
pub mod ventas;

pub mod cambios;
pub mod liquidaciones;

pub mod canastas;
pub mod reportes;

// Re-export common handler types
pub use crate::utils::{AppError, AppResult};
