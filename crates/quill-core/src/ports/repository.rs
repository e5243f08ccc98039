use async_trait::async_trait;

use crate::domain::{
    Comment, NewComment, NewPost, NewUser, Page, Post, PostChanges, PostQuery, User,
};
use crate::error::RepoError;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Permanently delete an entity by its ID. Dependent rows cascade.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    /// Find a user by their (lowercase) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn email_exists(&self, email: &str) -> Result<bool, RepoError>;

    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn update_password_hash(&self, id: i32, password_hash: &str) -> Result<(), RepoError>;

    async fn set_superuser(&self, id: i32, is_superuser: bool) -> Result<User, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn exists(&self, id: i32) -> Result<bool, RepoError>;

    /// Whether `slug` is used by any post other than `exclude`.
    async fn slug_taken(&self, slug: &str, exclude: Option<i32>) -> Result<bool, RepoError>;

    /// Posts matching `query`, newest first, with the total match count.
    async fn list(&self, query: &PostQuery) -> Result<(Vec<Post>, u64), RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError>;
}

/// Comment repository. `find_by_id` from [`BaseRepository`] also returns
/// soft-deleted rows; every other read skips them.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// Find a comment that has not been soft-deleted.
    async fn find_active(&self, id: i32) -> Result<Option<Comment>, RepoError>;

    /// Parent of comment `id`, or `None` for top-level (or unknown) comments.
    async fn parent_of(&self, id: i32) -> Result<Option<i32>, RepoError>;

    /// Active top-level comments of a post, oldest first, with their total count.
    async fn list_top_level(&self, post_id: i32, page: Page)
    -> Result<(Vec<Comment>, u64), RepoError>;

    /// Every active reply (comment with a parent) on a post, oldest first.
    async fn list_replies(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    /// Active direct replies to any of `parent_ids`, oldest first.
    async fn list_children(&self, parent_ids: &[i32]) -> Result<Vec<Comment>, RepoError>;

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    async fn update_content(&self, id: i32, content: &str) -> Result<Comment, RepoError>;

    /// Mark a comment as deleted without removing it or its replies.
    async fn soft_delete(&self, id: i32) -> Result<(), RepoError>;
}
