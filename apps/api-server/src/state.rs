//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::DbConn;

use quill_core::ports::{PasswordService, TokenService};
use quill_core::services::{AuthService, CommentService, PostService};
use quill_infra::{
    Argon2PasswordService, JwtConfig, JwtTokenService, SqlCommentRepository, SqlPostRepository,
    SqlUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
}

impl AppState {
    /// Wire the SQL repositories and auth adapters into the use cases.
    pub fn new(db: DbConn, jwt: JwtConfig) -> Self {
        let users = Arc::new(SqlUserRepository::new(db.clone()));
        let posts = Arc::new(SqlPostRepository::new(db.clone()));
        let comments = Arc::new(SqlCommentRepository::new(db.clone()));
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        tracing::info!("Application state initialized");

        Self {
            db,
            auth: AuthService::new(users, tokens, passwords),
            posts: PostService::new(posts.clone()),
            comments: CommentService::new(comments, posts),
        }
    }
}
