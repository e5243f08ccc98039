//! Health check endpoint.

use actix_web::{HttpResponse, web};

use quill_shared::dto::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - returns server and database status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (status, database) = match state.db.ping().await {
        Ok(()) => ("ok", "up"),
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            ("degraded", "down")
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now(),
    })
}
