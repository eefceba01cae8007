//! Shared utilities
//!
//! - [`AppError`] / [`ApiResponse`] - error and envelope types (from shared)
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::{ApiResponse, AppError, ErrorCode};
pub use result::AppResult;
