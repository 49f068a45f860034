//! Error types for the Sakila API
//!
//! Provides the error taxonomy shared by the repository and the HTTP layer:
//! - Validation failures on malformed or missing input
//! - Business outcomes (not-found, conflict) reported with their status codes
//! - Infrastructure failures reported as server errors without internal detail

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    ValidationError,
    MissingField,
    InvalidFormat,

    // Resource errors
    NotFound,
    CustomerNotFound,
    RentalNotFound,

    // Conflict errors
    NoCopyAvailable,

    // Database errors
    DatabaseError,
    ConnectionError,

    // Internal errors
    InternalError,
    ConfigurationError,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    // Resource errors
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: u16 },

    #[error("No open rental found with id {id}")]
    RentalNotFound { id: i32 },

    // Conflict errors
    #[error("No copies of film {film_id} are available to rent")]
    NoCopyAvailable { film_id: u16 },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}

impl AppError {
    /// Shorthand for a not-found error on an arbitrary resource
    pub fn not_found(resource_type: &str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::CustomerNotFound { .. } => ErrorCode::CustomerNotFound,
            AppError::RentalNotFound { .. } => ErrorCode::RentalNotFound,
            AppError::NoCopyAvailable { .. } => ErrorCode::NoCopyAvailable,
            AppError::Database(DbErr::ConnectionAcquire(_) | DbErr::Conn(_)) => {
                ErrorCode::ConnectionError
            }
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration(_) => ErrorCode::ConfigurationError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. }
            | AppError::MissingField { .. }
            | AppError::InvalidFormat { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::NotFound { .. }
            | AppError::CustomerNotFound { .. }
            | AppError::RentalNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::NoCopyAvailable { .. } => StatusCode::CONFLICT,

            // 503 Service Unavailable
            AppError::Database(DbErr::ConnectionAcquire(_) | DbErr::Conn(_))
            | AppError::DatabaseConnection { .. } => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::Internal { .. }
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Message safe to hand back to the caller.
    ///
    /// Server errors are collapsed to a generic sentence; the detail only
    /// goes to the log.
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::SERVICE_UNAVAILABLE => "Database unavailable".to_string(),
            status if status.is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let field = match &self {
            AppError::Validation { field, .. } => field.clone(),
            AppError::MissingField { field } => Some(field.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            message: self.public_message(),
            code,
            field,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the first offending field; the message keeps the full list.
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|name| name.to_string());

        AppError::Validation {
            message: errors.to_string(),
            field,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => AppError::InvalidFormat {
                message: "expected `Content-Type: application/json`".to_string(),
            },
            other => AppError::Validation {
                message: other.body_text(),
                field: None,
            },
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidFormat {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidFormat {
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::CustomerNotFound { id: 42 };
        assert_eq!(err.code(), ErrorCode::CustomerNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Customer not found: 42");
    }

    #[test]
    fn test_no_copy_is_conflict() {
        let err = AppError::NoCopyAvailable { film_id: 7 };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.is_client_error());
        assert!(err.public_message().contains("film 7"));
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::Validation {
            message: "first_name is empty".into(),
            field: Some("first_name".into()),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_database_error_hides_detail() {
        let err = AppError::Database(DbErr::Custom("table rental is corrupt".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_connection_error_is_unavailable() {
        let err = AppError::DatabaseConnection {
            message: "connection refused".into(),
        };
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), ErrorCode::ConnectionError);
        assert!(!err.public_message().contains("refused"));
    }

    #[test]
    fn test_config_error_is_internal() {
        let err: AppError = config::ConfigError::NotFound("database.port".into()).into();
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_not_found_helper() {
        let err = AppError::not_found("City", 600);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "City not found: 600");
    }
}
