//! Unified error codes for the Incolpan platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Catalog errors (sellers, products)
//! - 2xxx: Document errors (pedidos, extras, devoluciones, despachos)
//! - 3xxx: Consolidation errors (ventas)
//! - 4xxx: Settlement errors (liquidaciones, cambios)
//! - 5xxx: Crate ledger errors (canastas)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes are represented as u16 values for efficient serialization and
/// cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid date format
    InvalidDate = 6,

    // ==================== 1xxx: Catalog ====================
    /// Seller code already registered
    SellerCodeExists = 1001,
    /// Seller not found
    SellerNotFound = 1002,
    /// Product code already registered
    ProductCodeExists = 1003,
    /// Product not found
    ProductNotFound = 1004,

    // ==================== 2xxx: Documents ====================
    /// An order already exists for this seller and date
    OrderExistsForDate = 2001,
    /// An extra order already exists for this seller and date
    ExtraExistsForDate = 2002,
    /// Return limit (two per seller and date) reached
    ReturnLimitReached = 2003,
    /// Return is referenced by a consolidated sale
    ReturnInUse = 2004,
    /// A dispatch already exists for this origin document
    DispatchExistsForOrigin = 2005,
    /// Origin document not found for dispatch
    DispatchOriginNotFound = 2006,
    /// Document has no line items
    EmptyDocument = 2007,

    // ==================== 3xxx: Consolidation ====================
    /// A sale already exists for this seller and date
    SaleExistsForDate = 3001,
    /// Referenced return has exhausted its two uses
    ReturnUsesExhausted = 3002,
    /// Sale is settled and cannot be deleted
    SaleAlreadySettled = 3003,
    /// Consolidation produced no line items
    EmptyConsolidation = 3004,

    // ==================== 4xxx: Settlements ====================
    /// A settlement already exists for this seller and date
    SettlementExistsForDate = 4001,
    /// No unsettled sale for this seller and date
    NoPendingSale = 4002,
    /// A change adjustment already exists for this seller and date
    ChangeExistsForDate = 4003,

    // ==================== 5xxx: Crate ledger ====================
    /// Crate barcode already registered
    CrateExists = 5001,
    /// Crate not found
    CrateNotFound = 5002,
    /// Crate is already loaned out
    CrateAlreadyLoaned = 5003,
    /// Crate is not on loan
    CrateNotLoaned = 5004,
    /// Crate was loaned to a different seller
    CrateLoanedToOther = 5005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ErrorCode::*;
        let code = match value {
            0 => Success,
            1 => Unknown,
            2 => ValidationFailed,
            3 => NotFound,
            4 => AlreadyExists,
            5 => InvalidRequest,
            6 => InvalidDate,
            1001 => SellerCodeExists,
            1002 => SellerNotFound,
            1003 => ProductCodeExists,
            1004 => ProductNotFound,
            2001 => OrderExistsForDate,
            2002 => ExtraExistsForDate,
            2003 => ReturnLimitReached,
            2004 => ReturnInUse,
            2005 => DispatchExistsForOrigin,
            2006 => DispatchOriginNotFound,
            2007 => EmptyDocument,
            3001 => SaleExistsForDate,
            3002 => ReturnUsesExhausted,
            3003 => SaleAlreadySettled,
            3004 => EmptyConsolidation,
            4001 => SettlementExistsForDate,
            4002 => NoPendingSale,
            4003 => ChangeExistsForDate,
            5001 => CrateExists,
            5002 => CrateNotFound,
            5003 => CrateAlreadyLoaned,
            5004 => CrateNotLoaned,
            5005 => CrateLoanedToOther,
            9001 => InternalError,
            9002 => DatabaseError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

impl ErrorCode {
    /// The numeric wire value of this code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            Success => "Success",
            Unknown => "Unknown error",
            ValidationFailed => "Validation failed",
            NotFound => "Resource not found",
            AlreadyExists => "Resource already exists",
            InvalidRequest => "Invalid request",
            InvalidDate => "Invalid date format, expected YYYY-MM-DD",
            SellerCodeExists => "Seller code already registered",
            SellerNotFound => "Seller not found",
            ProductCodeExists => "Product code already registered",
            ProductNotFound => "Product not found",
            OrderExistsForDate => "An order already exists for this seller and date",
            ExtraExistsForDate => "An extra order already exists for this seller and date",
            ReturnLimitReached => "Two returns already exist for this seller and date",
            ReturnInUse => "Return is referenced by a consolidated sale",
            DispatchExistsForOrigin => "A dispatch already exists for this origin document",
            DispatchOriginNotFound => "Origin document not found",
            EmptyDocument => "Document has no line items",
            SaleExistsForDate => "A sale already exists for this seller and date",
            ReturnUsesExhausted => "Return has exhausted its two uses",
            SaleAlreadySettled => "Sale is settled and cannot be deleted",
            EmptyConsolidation => "Consolidation produced no line items",
            SettlementExistsForDate => "A settlement already exists for this seller and date",
            NoPendingSale => "No unsettled sale for this seller and date",
            ChangeExistsForDate => "A change adjustment already exists for this seller and date",
            CrateExists => "Crate barcode already registered",
            CrateNotFound => "Crate not found",
            CrateAlreadyLoaned => "Crate is already loaned out",
            CrateNotLoaned => "Crate is not on loan",
            CrateLoanedToOther => "Crate was loaned to a different seller",
            InternalError => "Internal server error",
            DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::SaleExistsForDate,
            ErrorCode::CrateLoanedToOther,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(ErrorCode::try_from(1234).is_err());
    }
}
