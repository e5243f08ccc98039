//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::middleware::{Compress, NormalizePath, TrailingSlash};
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use tracing_actix_web::TracingLogger;

use api_server::observability::RequestIdMiddleware;
use api_server::telemetry::{TelemetryConfig, init_telemetry};
use api_server::{AppConfig, AppState, configure_routes, cors};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    let db = quill_infra::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    if config.auto_migrate {
        Migrator::up(&db, None)
            .await
            .context("failed to apply database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let state = AppState::new(db, config.jwt.clone());

    if let Some(superuser) = &config.superuser {
        state
            .auth
            .ensure_superuser(&superuser.email, &superuser.password)
            .await
            .context("failed to bootstrap the superuser account")?;
    }

    tracing::info!("Starting Quill API Server on {}:{}", config.host, config.port);

    let origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(Compress::default())
            .wrap(cors(&origins))
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
