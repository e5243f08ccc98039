//! Data Transfer Objects - request/response types for the API.
//!
//! Request types implement [`Normalize`] (surrounding whitespace removed) and
//! [`Validate`]; handlers normalize first, then validate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Trim user-supplied text before validation. Passwords are left untouched.
pub trait Normalize {
    fn normalize(self) -> Self;
}

fn trim(value: String) -> String {
    match value.trim() {
        trimmed if trimmed.len() == value.len() => value,
        trimmed => trimmed.to_string(),
    }
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

// ---------------------------------------------------------------------------
// Users & auth
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
}

impl Normalize for RegisterUserRequest {
    fn normalize(self) -> Self {
        Self {
            email: trim(self.email).to_lowercase(),
            password: self.password,
        }
    }
}

/// OAuth2 password-flow login form. `username` carries the email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl Normalize for LoginForm {
    fn normalize(self) -> Self {
        Self {
            username: trim(self.username).to_lowercase(),
            password: self.password,
        }
    }
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Request to create a post. Without a slug one is derived from the title.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 200, message = "title must be 3-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "content cannot be empty"))]
    pub content: String,
    #[validate(length(min = 1, max = 240, message = "slug must be 1-240 characters"))]
    pub slug: Option<String>,
}

impl Normalize for CreatePostRequest {
    fn normalize(self) -> Self {
        Self {
            title: trim(self.title),
            content: trim(self.content),
            slug: self.slug.map(trim),
        }
    }
}

/// Partial post update; at least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "at_least_one_post_field", skip_on_field_errors = false))]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 200, message = "title must be 3-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content cannot be empty"))]
    pub content: Option<String>,
    #[validate(length(min = 1, max = 240, message = "slug must be 1-240 characters"))]
    pub slug: Option<String>,
}

impl Normalize for UpdatePostRequest {
    fn normalize(self) -> Self {
        Self {
            title: self.title.map(trim),
            content: self.content.map(trim),
            slug: self.slug.map(trim),
        }
    }
}

fn at_least_one_post_field(request: &UpdatePostRequest) -> Result<(), ValidationError> {
    if request.title.is_none() && request.content.is_none() && request.slug.is_none() {
        let mut error = ValidationError::new("at_least_one_field");
        error.message = Some("At least one field must be provided".into());
        return Err(error);
    }
    Ok(())
}

/// Query string of the post listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u64,
    #[validate(length(min = 1, message = "search cannot be empty"))]
    pub search: Option<String>,
}

impl Normalize for PostListQuery {
    fn normalize(self) -> Self {
        Self {
            search: self.search.map(trim),
            ..self
        }
    }
}

/// Post representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Request to comment on a post, or to reply to `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(range(min = 1, message = "post_id must be a positive integer"))]
    pub post_id: i32,
    #[validate(range(min = 1, message = "parent_id must be a positive integer"))]
    pub parent_id: Option<i32>,
    #[validate(length(min = 1, max = 2000, message = "content must be 1-2000 characters"))]
    pub content: String,
}

impl Normalize for CreateCommentRequest {
    fn normalize(self) -> Self {
        Self {
            content: trim(self.content),
            ..self
        }
    }
}

/// Request to replace a comment's content.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "content must be 1-2000 characters"))]
    pub content: String,
}

impl Normalize for UpdateCommentRequest {
    fn normalize(self) -> Self {
        Self {
            content: trim(self.content),
        }
    }
}

/// Query string of the comment listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u64,
}

impl Normalize for PageQuery {
    fn normalize(self) -> Self {
        self
    }
}

/// Comment with its active replies, recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub parent_id: Option<i32>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<CommentResponse>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub timestamp: DateTime<Utc>,
}
