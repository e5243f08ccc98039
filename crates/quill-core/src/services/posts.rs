//! Post use cases and slug allocation.

use std::sync::Arc;

use serde_json::json;

use crate::domain::{NewPost, Post, PostChanges, PostQuery, User};
use crate::error::DomainError;
use crate::ports::PostRepository;

use super::slug::slugify;

const FALLBACK_SLUG: &str = "post";

/// Input for creating a post. Strings are expected to be trimmed already.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
}

/// Post use cases.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a post owned by `author`.
    ///
    /// An explicit slug must be free; a slug derived from the title gets a
    /// numeric suffix until it is.
    pub async fn create(&self, author: &User, input: PostInput) -> Result<Post, DomainError> {
        let slug = match input.slug.as_deref() {
            Some(requested) => {
                let slug = slugify(requested);
                if slug.is_empty() {
                    return Err(DomainError::validation(
                        "Slug must contain at least one letter or digit",
                        json!({ "slug": requested }),
                    ));
                }
                if self.posts.slug_taken(&slug, None).await? {
                    return Err(DomainError::Duplicate {
                        field: "slug",
                        value: slug,
                    });
                }
                slug
            }
            None => self.unique_slug(&slugify(&input.title), None).await?,
        };

        let post = self
            .posts
            .create(NewPost {
                author_id: author.id,
                title: input.title,
                slug,
                content: input.content,
            })
            .await
            .map_err(DomainError::database("create"))?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Fetch a post by numeric id, falling back to a slug lookup.
    pub async fn get(&self, id_or_slug: &str) -> Result<Post, DomainError> {
        let by_id = match id_or_slug.parse::<i32>() {
            Ok(id) => self.posts.find_by_id(id).await?,
            Err(_) => None,
        };

        let post = match by_id {
            Some(post) => Some(post),
            None => self.posts.find_by_slug(id_or_slug).await?,
        };

        post.ok_or_else(|| {
            DomainError::not_found(
                format!("Post with id or slug '{id_or_slug}' not found."),
                json!({ "id_or_slug": id_or_slug }),
            )
        })
    }

    /// List posts, newest first, with the total number of matches.
    pub async fn list(&self, query: &PostQuery) -> Result<(Vec<Post>, u64), DomainError> {
        Ok(self.posts.list(query).await?)
    }

    /// Apply `changes` to a post the actor is allowed to edit.
    pub async fn update(
        &self,
        actor: &User,
        post_id: i32,
        mut changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let post = self.find_owned(actor, post_id, "edit").await?;

        if let Some(requested) = changes.slug.take() {
            let mut base = slugify(&requested);
            if base.is_empty() {
                base = slugify(changes.title.as_deref().unwrap_or(&post.title));
            }
            changes.slug = Some(self.unique_slug(&base, Some(post.id)).await?);
        }

        let updated = self
            .posts
            .update(post.id, changes)
            .await
            .map_err(DomainError::database("update"))?;

        tracing::info!(post_id = updated.id, actor_id = actor.id, "Post updated");
        Ok(updated)
    }

    /// Permanently delete a post and, through the database, its comments.
    pub async fn delete(&self, actor: &User, post_id: i32) -> Result<Post, DomainError> {
        let post = self.find_owned(actor, post_id, "delete").await?;

        self.posts
            .delete(post.id)
            .await
            .map_err(DomainError::database("delete"))?;

        tracing::info!(post_id = post.id, actor_id = actor.id, "Post deleted");
        Ok(post)
    }

    async fn find_owned(
        &self,
        actor: &User,
        post_id: i32,
        action: &str,
    ) -> Result<Post, DomainError> {
        let post = self.posts.find_by_id(post_id).await?.ok_or_else(|| {
            DomainError::not_found(
                format!("Post with id {post_id} not found."),
                json!({ "post_id": post_id }),
            )
        })?;

        if !actor.can_modify(post.author_id) {
            return Err(DomainError::permission_denied(
                format!("You are not allowed to {action} this post."),
                json!({ "post_id": post_id, "actor_id": actor.id }),
            ));
        }

        Ok(post)
    }

    /// First free slug among `base`, `base-2`, `base-3`, ...
    async fn unique_slug(&self, base: &str, exclude: Option<i32>) -> Result<String, DomainError> {
        let base = if base.is_empty() { FALLBACK_SLUG } else { base };

        let mut candidate = base.to_string();
        let mut suffix = 1;
        while self.posts.slug_taken(&candidate, exclude).await? {
            suffix += 1;
            candidate = format!("{base}-{suffix}");
        }

        Ok(candidate)
    }
}
