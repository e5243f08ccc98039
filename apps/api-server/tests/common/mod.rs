//! Shared harness for the HTTP tests: a fresh in-memory database per app.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use api_server::{AppState, configure_routes};
use migration::{Migrator, MigratorTrait};
use quill_infra::{DatabaseConfig, JwtConfig, connect};

pub const PASSWORD: &str = "password123";

/// Anything `init_service` hands back for our `App`.
pub trait TestApp: Service<Request, Response = ServiceResponse, Error = actix_web::Error> {}

impl<S> TestApp for S where S: Service<Request, Response = ServiceResponse, Error = actix_web::Error> {}

pub async fn state() -> AppState {
    let db = connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    AppState::new(db, JwtConfig {
        secret: "test-secret".to_string(),
        expiration_minutes: 60,
        issuer: "quill-test".to_string(),
    })
}

pub async fn app(state: AppState) -> impl TestApp {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await
}

/// Fresh state and app in one go.
pub async fn setup() -> impl TestApp {
    app(state().await).await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

pub async fn register(app: &impl TestApp, email: &str, password: &str) -> ServiceResponse {
    let req = test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login(app: &impl TestApp, email: &str, password: &str) -> ServiceResponse {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_form([("username", email), ("password", password)])
        .to_request();
    test::call_service(app, req).await
}

/// Log in an account that already exists and return its access token.
pub async fn token_for(app: &impl TestApp, email: &str) -> String {
    let resp = login(app, email, PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Register a new account and return its access token.
pub async fn sign_up(app: &impl TestApp, email: &str) -> String {
    let resp = register(app, email, PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    token_for(app, email).await
}

pub async fn send(
    app: &impl TestApp,
    req: test::TestRequest,
    token: Option<&str>,
) -> ServiceResponse {
    let req = match token {
        Some(token) => req.insert_header(bearer(token)),
        None => req,
    };
    test::call_service(app, req.to_request()).await
}

/// Status plus JSON body (`Null` for empty bodies).
pub async fn json_of(resp: ServiceResponse) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };
    (status, body)
}

pub async fn create_post(app: &impl TestApp, token: &str, body: Value) -> Value {
    let resp = send(
        app,
        test::TestRequest::post().uri("/api/v1/posts").set_json(body),
        Some(token),
    )
    .await;
    let (status, body) = json_of(resp).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body
}

pub async fn post_comment(
    app: &impl TestApp,
    token: &str,
    post_id: i64,
    parent_id: Option<i64>,
    content: &str,
) -> (StatusCode, Value) {
    let resp = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/comments")
            .set_json(json!({ "post_id": post_id, "parent_id": parent_id, "content": content })),
        Some(token),
    )
    .await;
    json_of(resp).await
}

/// Create a comment and return its id.
pub async fn comment_id(
    app: &impl TestApp,
    token: &str,
    post_id: i64,
    parent_id: Option<i64>,
) -> i64 {
    let (status, body) = post_comment(app, token, post_id, parent_id, "A comment").await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["id"].as_i64().expect("comment id missing")
}
