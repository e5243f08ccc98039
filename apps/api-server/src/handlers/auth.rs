//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{LoginForm, TokenResponse};

use super::user_response;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::middleware::validation::validated;
use crate::state::AppState;

/// POST /api/v1/auth/login - OAuth2 password form, `username` is the email.
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = validated(form.into_inner())?;

    let token = state.auth.login(&form.username, &form.password).await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: token.access_token,
        token_type: token.token_type.to_string(),
        expires_in: token.expires_in,
    }))
}

/// GET /api/v1/auth/me - Protected route
pub async fn me(user: CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_response(&user)))
}
