//! Use cases - one service per aggregate, each enforcing the business rules
//! on top of the repository ports.

mod auth;
mod comments;
mod posts;
mod slug;
#[cfg(test)]
mod testing;

pub use auth::{AccessToken, AuthService};
pub use comments::{CommentService, MAX_REPLY_DEPTH};
pub use posts::{PostInput, PostService};
pub use slug::slugify;
