//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{DatabaseConfig, JwtConfig};

/// Credentials of the superuser account created at startup.
#[derive(Debug, Clone)]
pub struct SuperuserConfig {
    pub email: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Apply pending migrations before serving.
    pub auto_migrate: bool,
    pub jwt: JwtConfig,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
    pub superuser: Option<SuperuserConfig>,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_env(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://quill.db?mode=rwc".to_string()),
            max_connections: parse_env("DB_MAX_CONNECTIONS", 10),
            min_connections: parse_env("DB_MIN_CONNECTIONS", 1),
            sql_logging: flag_env("DB_SQL_LOGGING", false),
        };

        let superuser = match (env::var("SUPERUSER_EMAIL"), env::var("SUPERUSER_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() => {
                Some(SuperuserConfig { email, password })
            }
            (Ok(_), Err(_)) => {
                tracing::warn!("SUPERUSER_EMAIL set without SUPERUSER_PASSWORD; skipping bootstrap");
                None
            }
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT", 8080),
            database,
            auto_migrate: flag_env("AUTO_MIGRATE", true),
            jwt: JwtConfig::from_env(),
            cors_allowed_origins: Self::parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            superuser,
        }
    }

    /// Parse a comma-separated origin list.
    /// Example: CORS_ALLOWED_ORIGINS=https://admin.example.com,http://localhost:3000
    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }
}
