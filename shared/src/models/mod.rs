//! Data models
//!
//! Shared between the server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); business dates are
//! `YYYY-MM-DD` strings; timestamps are UTC milliseconds.

pub mod cambio;
pub mod canasta;
pub mod despacho;
pub mod devolucion;
pub mod documento;
pub mod extra;
pub mod liquidacion;
pub mod paging;
pub mod pedido;
pub mod producto;
pub mod reporte;
pub mod vendedor;
pub mod venta;

// Re-exports
pub use cambio::*;
pub use canasta::*;
pub use despacho::*;
pub use devolucion::*;
pub use documento::*;
pub use extra::*;
pub use liquidacion::*;
pub use paging::*;
pub use pedido::*;
pub use producto::*;
pub use reporte::*;
pub use vendedor::*;
pub use venta::*;
