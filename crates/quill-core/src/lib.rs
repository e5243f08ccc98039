//! # Quill Core
//!
//! The domain layer of the Quill headless CMS.
//! This crate contains the entities, the ports infrastructure must implement,
//! and the use cases (services) that enforce the business rules. It has no
//! database or HTTP dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
