//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Page, PostChanges, PostQuery};
use quill_core::services::PostInput;
use quill_shared::ListResponse;
use quill_shared::dto::{CreatePostRequest, PostListQuery, UpdatePostRequest};

use super::{positive_id, post_response};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::middleware::validation::validated;
use crate::state::AppState;

/// POST /api/v1/posts
pub async fn create(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let post = state
        .posts
        .create(&user, PostInput {
            title: req.title,
            content: req.content,
            slug: req.slug,
        })
        .await?;

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/v1/posts?skip=&limit=&search=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = validated(query.into_inner())?;

    let (posts, total) = state
        .posts
        .list(&PostQuery {
            page: Page {
                skip: query.skip,
                limit: query.limit,
            },
            search: query.search,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ListResponse::new(
        total,
        posts.into_iter().map(post_response).collect(),
    )))
}

/// GET /api/v1/posts/{id_or_slug}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.trim()).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PATCH /api/v1/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = positive_id("post_id", path.into_inner())?;
    let req = validated(body.into_inner())?;

    let post = state
        .posts
        .update(&user, post_id, PostChanges {
            title: req.title,
            content: req.content,
            slug: req.slug,
        })
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/v1/posts/{post_id}
pub async fn delete(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = positive_id("post_id", path.into_inner())?;

    state.posts.delete(&user, post_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
