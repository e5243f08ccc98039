//! Domain entities - the core business objects.

mod comment;
mod post;
mod user;

pub use comment::{Comment, CommentThread, NewComment};
pub use post::{NewPost, Page, Post, PostChanges, PostQuery};
pub use user::{NewUser, User};
