//! Shared types for the Incolpan distribution platform
//!
//! This crate holds everything that crosses a process or module boundary:
//!
//! - [`models`]: domain entities and their create/update payloads
//! - [`error`]: unified error codes, [`error::AppError`] and the JSON
//!   [`error::ApiResponse`] envelope
//! - [`message`]: bus messages for the resource-sync push channel
//! - [`util`]: timestamps and snowflake IDs

pub mod error;
pub mod message;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{BusMessage, SyncPayload};
