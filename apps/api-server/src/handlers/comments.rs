//! Comment handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::Page;
use quill_shared::ListResponse;
use quill_shared::dto::{CreateCommentRequest, PageQuery, UpdateCommentRequest};

use super::{comment_response, positive_id, thread_response};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::middleware::validation::validated;
use crate::state::AppState;

/// POST /api/v1/comments
pub async fn create(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let comment = state
        .comments
        .create(&user, req.post_id, req.parent_id, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// GET /api/v1/comments/{comment_id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let comment_id = positive_id("comment_id", path.into_inner())?;

    let thread = state.comments.get(comment_id).await?;

    Ok(HttpResponse::Ok().json(thread_response(thread)))
}

/// GET /api/v1/comments/post/{post_id}?skip=&limit=
pub async fn list_for_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let post_id = positive_id("post_id", path.into_inner())?;
    let query = validated(query.into_inner())?;

    let (threads, total) = state
        .comments
        .list(post_id, Page {
            skip: query.skip,
            limit: query.limit,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ListResponse::new(
        total,
        threads.into_iter().map(thread_response).collect(),
    )))
}

/// PATCH /api/v1/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment_id = positive_id("comment_id", path.into_inner())?;
    let req = validated(body.into_inner())?;

    let comment = state.comments.update(&user, comment_id, &req.content).await?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// DELETE /api/v1/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let comment_id = positive_id("comment_id", path.into_inner())?;

    state.comments.delete(&user, comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
