//! Database connection management and SeaORM-backed repositories.

mod base;
mod connections;
pub mod entity;
pub mod repositories;

pub use base::SqlRepository;
pub use connections::{DatabaseConfig, connect};
pub use repositories::{SqlCommentRepository, SqlPostRepository, SqlUserRepository};

#[cfg(test)]
mod tests;
