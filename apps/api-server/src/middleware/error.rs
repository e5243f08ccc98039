//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use serde_json::Value;
use thiserror::Error;

use quill_core::error::{DomainError, RepoError};
use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    NotFound { message: String, data: Value },

    #[error("{message}")]
    Duplicate { message: String, data: Value },

    #[error("{message}")]
    Conflict { message: String, data: Value },

    #[error("{message}")]
    Forbidden { message: String, data: Value },

    #[error("{message}")]
    Validation { message: String, data: Value },

    #[error("{0}")]
    BadRequest(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Failed to perform {operation} operation")]
    Database { operation: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, data: Value) -> Self {
        Self::Validation {
            message: message.into(),
            data,
        }
    }

    /// Stable application error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "ENTITY_NOT_FOUND",
            AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::Forbidden { .. } => "PERMISSION_DENIED",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized(_) => "INVALID_TOKEN",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn data(&self) -> Value {
        match self {
            AppError::NotFound { data, .. }
            | AppError::Duplicate { data, .. }
            | AppError::Conflict { data, .. }
            | AppError::Forbidden { data, .. }
            | AppError::Validation { data, .. } => data.clone(),
            _ => Value::Null,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let title = status.canonical_reason().unwrap_or("Error");

        let error = match self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                ErrorResponse::new(status.as_u16(), title, self.code())
            }
            AppError::Database { .. } => {
                ErrorResponse::new(status.as_u16(), title, self.code()).with_detail(self.to_string())
            }
            _ => ErrorResponse::new(status.as_u16(), title, self.code())
                .with_detail(self.to_string())
                .with_data(self.data()),
        };

        let mut response = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message, data } => AppError::NotFound { message, data },
            DomainError::Duplicate { .. } => AppError::Duplicate {
                message: err.to_string(),
                data: err.data(),
            },
            DomainError::Conflict { message, data } => AppError::Conflict { message, data },
            DomainError::PermissionDenied { message, data } => {
                AppError::Forbidden { message, data }
            }
            DomainError::Validation { message, data } => AppError::Validation { message, data },
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::Database { operation, source } => {
                tracing::error!(operation, error = %source, "Database operation failed");
                AppError::Database {
                    operation: operation.to_string(),
                }
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::TokenExpired => AppError::Unauthorized(
                "Your authentication token has expired. Please login again.".to_string(),
            ),
            AuthError::MissingAuth => AppError::Unauthorized(
                "Please provide a valid Bearer token in the Authorization header.".to_string(),
            ),
            AuthError::InvalidToken(reason) => {
                tracing::debug!(%reason, "Rejected bearer token");
                AppError::Unauthorized("Could not validate authentication credentials".to_string())
            }
            AuthError::UnknownSubject => {
                AppError::Unauthorized("Could not validate authentication credentials".to_string())
            }
            AuthError::HashingError(msg) | AuthError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
