//! User registration.

use actix_web::{HttpResponse, web};

use quill_shared::dto::RegisterUserRequest;

use super::user_response;
use crate::middleware::error::AppResult;
use crate::middleware::validation::validated;
use crate::state::AppState;

/// POST /api/v1/users/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body.into_inner())?;

    let user = state.auth.register(&req.email, &req.password).await?;

    Ok(HttpResponse::Created().json(user_response(&user)))
}
