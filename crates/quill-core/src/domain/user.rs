use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - an account that can author posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this user may edit or delete content written by `author_id`.
    pub fn can_modify(&self, author_id: i32) -> bool {
        self.is_superuser || self.id == author_id
    }
}

/// Data needed to persist a new user. The id and timestamps are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub is_superuser: bool,
}
