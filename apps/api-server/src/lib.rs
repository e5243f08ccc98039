//! # Quill API Server
//!
//! Actix-web front end of the Quill headless CMS: routing, request
//! validation, authentication and error mapping over the `quill-core` use
//! cases.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_cors::Cors;

pub use config::AppConfig;
pub use handlers::configure_routes;
pub use state::AppState;

use observability::REQUEST_ID_HEADER;

/// CORS policy: any origin when `allowed_origins` is empty, otherwise only
/// the listed ones. The request id header is exposed to browsers.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .expose_headers([REQUEST_ID_HEADER])
        .max_age(3600)
}
