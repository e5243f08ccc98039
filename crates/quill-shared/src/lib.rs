//! # Quill Shared
//!
//! Wire types of the HTTP API: validated request bodies, response bodies and
//! the problem-details error envelope. Kept free of server dependencies so
//! clients can reuse it.

pub mod dto;
pub mod response;

pub use dto::Normalize;
pub use response::{ErrorResponse, ListResponse};
