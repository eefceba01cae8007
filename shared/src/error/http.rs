//! HTTP mappings for error codes
//!
//! Keeps the transport concern out of [`super::types`]: error codes map to
//! HTTP status codes here, and [`AppError`] renders itself as a JSON
//! [`ApiResponse`] body via axum's `IntoResponse`.

use super::codes::ErrorCode;
use super::types::{ApiResponse, AppError};
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

impl ErrorCode {
    /// Map this code onto an HTTP status
    pub fn http_status(&self) -> StatusCode {
        use ErrorCode::*;
        match self {
            Success => StatusCode::OK,

            ValidationFailed | InvalidRequest | InvalidDate | EmptyDocument
            | EmptyConsolidation => StatusCode::BAD_REQUEST,

            NotFound | SellerNotFound | ProductNotFound | DispatchOriginNotFound
            | NoPendingSale | CrateNotFound => StatusCode::NOT_FOUND,

            AlreadyExists | SellerCodeExists | ProductCodeExists | OrderExistsForDate
            | ExtraExistsForDate | DispatchExistsForOrigin | SaleExistsForDate
            | SettlementExistsForDate | ChangeExistsForDate | CrateExists => StatusCode::CONFLICT,

            ReturnLimitReached | ReturnInUse | ReturnUsesExhausted | SaleAlreadySettled
            | CrateAlreadyLoaned | CrateNotLoaned | CrateLoanedToOther => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            Unknown | InternalError | DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = self.code.code(), "{}", self.message);
        }
        (status, Json(ApiResponse::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_maps_to_200() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn validation_family_maps_to_400() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidDate.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::EmptyDocument.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_family_maps_to_404() {
        assert_eq!(
            ErrorCode::SellerNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::NoPendingSale.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn duplicate_family_maps_to_409() {
        assert_eq!(
            ErrorCode::OrderExistsForDate.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::SettlementExistsForDate.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn business_rule_family_maps_to_422() {
        assert_eq!(
            ErrorCode::ReturnUsesExhausted.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::SaleAlreadySettled.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::CrateLoanedToOther.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn system_family_maps_to_500() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
