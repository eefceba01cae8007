//! Unified result alias for HTTP handlers and application logic

use crate::utils::AppError;

pub type AppResult<T> = Result<T, AppError>;
