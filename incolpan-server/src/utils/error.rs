//! Error types (re-exported from shared) and repository error mapping

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::Duplicate(what) => AppError::already_exists(what),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Rule(code, msg) => AppError::with_message(code, msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_errors_keep_their_code() {
        let err: AppError = RepoError::rule(ErrorCode::SaleExistsForDate).into();
        assert_eq!(err.code, ErrorCode::SaleExistsForDate);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err: AppError = RepoError::NotFound("Pedido 1".into()).into();
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }
}
