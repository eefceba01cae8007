//! Unified error handling
//!
//! - [`ErrorCode`]: stable u16 codes grouped by domain
//! - [`AppError`]: the application error type (code + message + details)
//! - [`ApiResponse`]: the JSON envelope every endpoint returns
//! - HTTP status mapping and `IntoResponse` live in [`http`]

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
