//! # Error Types
//!
//! Domain-specific error types for stockx-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockx-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger rule violations, tenant misses          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockx-db errors (separate crate)                                     │
//! │  └── DbError          - Database failures (wraps CoreError)            │
//! │                                                                         │
//! │  stockx-api errors                                                     │
//! │  └── ApiError         - What HTTP clients see (status + JSON)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger and tenancy errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product does not exist in the caller's store.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist at all
    /// - Product exists but belongs to another store (tenant isolation)
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No stock row exists for the product yet.
    ///
    /// ## When This Occurs
    /// - Selling a product that never received a stock-in
    /// - Updating stock that was never created
    #[error("Stock does not exist for product {0}")]
    StockNotFound(String),

    /// Store cannot be found.
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// Insufficient stock to complete a debit.
    ///
    /// ## User Workflow
    /// ```text
    /// Record a Sale (qty: 8)
    ///      │
    ///      ▼
    /// Check stock: available=7
    ///      │
    ///      ▼
    /// InsufficientStock { code: "ABC123", available: 7, requested: 8 }
    ///      │
    ///      ▼
    /// Bot shows: "Insufficient stock for ABC123: available 7, requested 8"
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for every "row is missing" flavour of error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ProductNotFound(_) | CoreError::StockNotFound(_) | CoreError::StoreNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any database work runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, bad color code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Referenced record belongs to a different store.
    #[error("{field} '{value}' does not belong to this store")]
    ForeignStore { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            code: "ABC123".to_string(),
            available: 7,
            requested: 8,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for ABC123: available 7, requested 8"
        );

        let err = CoreError::StockNotFound("p-1".to_string());
        assert_eq!(err.to_string(), "Stock does not exist for product p-1");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(!core_err.is_not_found());
    }

    #[test]
    fn test_not_found_family() {
        assert!(CoreError::ProductNotFound("x".into()).is_not_found());
        assert!(CoreError::StockNotFound("x".into()).is_not_found());
        assert!(CoreError::StoreNotFound("x".into()).is_not_found());
    }
}
