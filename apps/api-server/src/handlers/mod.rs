//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod users;

use actix_web::web;

use quill_core::domain::{Comment, CommentThread, Post, User};
use quill_shared::dto::{CommentResponse, PostResponse, UserResponse};

use crate::middleware::error::AppError;
use crate::middleware::validation;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::form_config())
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/v1")
                        .service(
                            web::scope("/users")
                                .route("/register", web::post().to(users::register)),
                        )
                        .service(
                            web::scope("/auth")
                                .route("/login", web::post().to(auth::login))
                                .route("/me", web::get().to(auth::me)),
                        )
                        .service(
                            web::scope("/posts")
                                .route("", web::post().to(posts::create))
                                .route("", web::get().to(posts::list))
                                .route("/{id_or_slug}", web::get().to(posts::get))
                                .route("/{post_id}", web::patch().to(posts::update))
                                .route("/{post_id}", web::delete().to(posts::delete)),
                        )
                        .service(
                            web::scope("/comments")
                                .route("", web::post().to(comments::create))
                                .route("/post/{post_id}", web::get().to(comments::list_for_post))
                                .route("/{comment_id}", web::get().to(comments::get))
                                .route("/{comment_id}", web::patch().to(comments::update))
                                .route("/{comment_id}", web::delete().to(comments::delete)),
                        ),
                ),
        );
}

/// Reject ids below 1 the same way as any other invalid input.
fn positive_id(name: &'static str, id: i32) -> Result<i32, AppError> {
    if id < 1 {
        return Err(AppError::validation(
            format!("{name} must be a positive integer"),
            serde_json::json!({ name: id }),
        ));
    }
    Ok(id)
}

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        is_superuser: user.is_superuser,
        created_at: user.created_at,
    }
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        author_id: post.author_id,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn comment_response(comment: Comment) -> CommentResponse {
    thread_response(CommentThread::leaf(comment))
}

fn thread_response(thread: CommentThread) -> CommentResponse {
    let CommentThread { comment, replies } = thread;
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        parent_id: comment.parent_id,
        content: comment.content,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
        replies: replies.into_iter().map(thread_response).collect(),
    }
}
