//! Domain-level error types.

use serde_json::{Value, json};
use thiserror::Error;

/// Domain errors - business rule failures raised by the services.
///
/// Each variant carries a client-facing message and, where useful, a JSON
/// object with the values that caused the failure.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{message}")]
    NotFound { message: String, data: Value },

    #[error("{field} '{value}' already exists.")]
    Duplicate { field: &'static str, value: String },

    #[error("{message}")]
    Conflict { message: String, data: Value },

    #[error("{message}")]
    PermissionDenied { message: String, data: Value },

    #[error("{message}")]
    Validation { message: String, data: Value },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to perform {operation} operation")]
    Database {
        operation: &'static str,
        #[source]
        source: RepoError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>, data: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            data,
        }
    }

    pub fn conflict(message: impl Into<String>, data: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            data,
        }
    }

    pub fn permission_denied(message: impl Into<String>, data: Value) -> Self {
        Self::PermissionDenied {
            message: message.into(),
            data,
        }
    }

    pub fn validation(message: impl Into<String>, data: Value) -> Self {
        Self::Validation {
            message: message.into(),
            data,
        }
    }

    /// Wrap a repository failure, naming the operation that was attempted.
    ///
    /// Constraint violations mean the write lost a race against another
    /// request (a slug or email taken meanwhile, a parent row deleted), so
    /// they become conflicts rather than database failures.
    pub fn database(operation: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| match source {
            RepoError::Constraint(detail) => {
                tracing::debug!(operation, %detail, "Write rejected by a database constraint");
                Self::conflict(
                    format!("The {operation} operation conflicts with existing data."),
                    json!({ "operation": operation }),
                )
            }
            source => Self::Database { operation, source },
        }
    }

    /// Contextual data attached to the error, `null` when there is none.
    pub fn data(&self) -> Value {
        match self {
            Self::NotFound { data, .. }
            | Self::Conflict { data, .. }
            | Self::PermissionDenied { data, .. }
            | Self::Validation { data, .. } => data.clone(),
            Self::Duplicate { field, value } => json!({ *field: value }),
            Self::Database { operation, .. } => json!({ "operation": operation }),
            Self::InvalidCredentials | Self::Internal(_) => Value::Null,
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(message) => Self::conflict(message, Value::Null),
            other => Self::Database {
                operation: "query",
                source: other,
            },
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
