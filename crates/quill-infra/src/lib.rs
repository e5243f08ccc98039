//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM repositories over SQLite or PostgreSQL, JWT tokens and Argon2
//! password hashing.
//!
//! ## Feature Flags
//!
//! - `sqlite` (default) - SQLite driver
//! - `postgres` - PostgreSQL driver
//! - `auth` (default) - JWT + Argon2 authentication
//! - `full` - Everything above

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::{
    DatabaseConfig, SqlCommentRepository, SqlPostRepository, SqlUserRepository, connect,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
