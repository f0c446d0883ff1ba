//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in StockX                                 │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │         │                                                               │
//! │         ├── DbError::UniqueViolation ───────────────┐                   │
//! │         ├── DbError::Core(InsufficientStock) ───────┤                   │
//! │         ├── ValidationError ────────────────────────┼──► ApiError       │
//! │         └── JsonRejection / QueryRejection ─────────┘        │          │
//! │                                                              ▼          │
//! │                        HTTP 400 {"error": "...", "code": "..."}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The body always carries a human-readable `error` and a machine-readable
//! `code`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockx_core::{CoreError, ValidationError};
use stockx_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "error": "Insufficient stock for ABC123: available 7, requested 8",
///   "code": "INSUFFICIENT_STOCK"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    #[serde(rename = "error")]
    pub message: String,

    #[serde(skip)]
    status: Option<StatusCode>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// No stock row for the product (404, 400 on the sales endpoint)
    StockNotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Unique constraint hit (400)
    Duplicate,

    /// Debit larger than stock on hand (400)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound | ErrorCode::StockNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::Duplicate | ErrorCode::InsufficientStock => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Overrides the status derived from the code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or_else(|| self.code.status())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "Request failed");
        } else {
            tracing::warn!(code = ?self.code, message = %self.message, status = status.as_u16(), "Request rejected");
        }
        (status, Json(self)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{field} '{value}' already exists"),
            ),
            DbError::Core(core) => core.into(),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::StoreNotFound(id) => ApiError::not_found("Store", &id),
            e @ CoreError::StockNotFound(_) => ApiError::new(ErrorCode::StockNotFound, e.to_string()),
            e @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, e.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = DbError::Core(CoreError::InsufficientStock {
            code: "ABC123".into(),
            available: 7,
            requested: 8,
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err: ApiError = DbError::Core(CoreError::StockNotFound("X".into())).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.with_status(StatusCode::BAD_REQUEST).status(),
            StatusCode::BAD_REQUEST
        );

        let err: ApiError = DbError::duplicate("code", "ABC123").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = DbError::Internal("boom".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_body_shape() {
        let err = ApiError::validation("quantity_sold must be positive");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "quantity_sold must be positive");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json.get("status").is_none());
    }
}
