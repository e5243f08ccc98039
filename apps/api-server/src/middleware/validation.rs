//! Request validation helpers and extractor error handlers.
//!
//! Every malformed body, form, query string or path segment becomes a 422
//! problem-details response.

use actix_web::{HttpRequest, error, web};
use serde_json::{Map, Value, json};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use quill_shared::Normalize;

use super::error::AppError;

/// Normalize then validate a request DTO.
pub fn validated<T>(value: T) -> Result<T, AppError>
where
    T: Normalize + Validate,
{
    let value = value.normalize();
    value.validate().map_err(validation_error)?;
    Ok(value)
}

/// Map validator errors to a 422 with `{field: [messages]}` as data.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields = Map::new();
    collect(&errors, None, &mut fields);

    AppError::validation("Request validation failed", Value::Object(fields))
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Map<String, Value>) {
    for (field, kind) in errors.errors() {
        let field: &str = field;
        let key = match (prefix, field) {
            (_, "__all__") => prefix.unwrap_or("__all__").to_string(),
            (Some(prefix), field) => format!("{prefix}.{field}"),
            (None, field) => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages: Vec<Value> = list
                    .iter()
                    .map(|e| Value::String(e.message.as_deref().unwrap_or(&e.code).to_string()))
                    .collect();
                out.insert(key, Value::Array(messages));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&key), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, Some(&format!("{key}[{index}]")), out);
                }
            }
        }
    }
}

fn malformed(kind: &str, detail: String) -> actix_web::Error {
    tracing::debug!(kind, %detail, "Rejected malformed request");
    AppError::validation(format!("Invalid {kind}"), json!({ "reason": detail })).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
            malformed("request body", err.to_string())
        })
}

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .limit(16 * 1024)
        .error_handler(|err: error::UrlencodedError, _req: &HttpRequest| {
            malformed("form data", err.to_string())
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        malformed("query parameters", err.to_string())
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
        malformed("path parameter", err.to_string())
    })
}
