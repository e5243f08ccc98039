use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a published article addressed by id or by its unique slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post ready to be inserted. `slug` is already normalized and unique.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
}

/// Field changes applied to an existing post; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
}

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 20 }
    }
}

/// Listing criteria for posts.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub page: Page,
    /// Case-insensitive substring matched against title and content.
    pub search: Option<String>,
}
