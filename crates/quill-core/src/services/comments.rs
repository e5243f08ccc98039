//! Threaded comments with a bounded reply depth and soft deletion.

use std::sync::Arc;

use serde_json::json;

use crate::domain::{Comment, CommentThread, NewComment, Page, User};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository};

/// Deepest level a comment may be replied to. Top-level comments sit at
/// depth 0, so threads are at most three comments deep.
pub const MAX_REPLY_DEPTH: usize = 2;

/// Comment use cases.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Add a comment to a post, optionally as a reply to `parent_id`.
    pub async fn create(
        &self,
        author: &User,
        post_id: i32,
        parent_id: Option<i32>,
        content: &str,
    ) -> Result<Comment, DomainError> {
        if !self.posts.exists(post_id).await? {
            return Err(DomainError::not_found(
                format!("Post with id {post_id} was not found."),
                json!({ "post_id": post_id }),
            ));
        }

        if let Some(parent_id) = parent_id {
            self.check_parent(post_id, parent_id).await?;
        }

        let comment = self
            .comments
            .create(NewComment {
                post_id,
                author_id: author.id,
                parent_id,
                content: content.trim().to_string(),
            })
            .await
            .map_err(DomainError::database("create"))?;

        tracing::info!(
            comment_id = comment.id,
            post_id,
            parent_id = ?parent_id,
            "Comment created"
        );
        Ok(comment)
    }

    /// An active comment with its active replies.
    pub async fn get(&self, comment_id: i32) -> Result<CommentThread, DomainError> {
        let comment = self
            .comments
            .find_active(comment_id)
            .await?
            .ok_or_else(|| Self::gone(comment_id))?;

        // One query per reply level below the comment.
        let mut replies = Vec::new();
        let mut parents = vec![comment.id];
        for _ in 0..MAX_REPLY_DEPTH {
            let children = self.comments.list_children(&parents).await?;
            if children.is_empty() {
                break;
            }
            parents = children.iter().map(|c| c.id).collect();
            replies.extend(children);
        }

        let mut threads = CommentThread::assemble(vec![comment], replies);
        threads.pop().ok_or_else(|| Self::gone(comment_id))
    }

    /// One page of top-level comments on a post, each with its replies,
    /// and the total number of top-level comments.
    pub async fn list(
        &self,
        post_id: i32,
        page: Page,
    ) -> Result<(Vec<CommentThread>, u64), DomainError> {
        if !self.posts.exists(post_id).await? {
            return Err(DomainError::not_found(
                format!("Post with id {post_id} not found."),
                json!({ "post_id": post_id }),
            ));
        }

        let (roots, total) = self.comments.list_top_level(post_id, page).await?;
        if roots.is_empty() {
            return Ok((Vec::new(), total));
        }

        let replies = self.comments.list_replies(post_id).await?;
        Ok((CommentThread::assemble(roots, replies), total))
    }

    /// Replace the content of a comment the actor is allowed to edit.
    pub async fn update(
        &self,
        actor: &User,
        comment_id: i32,
        content: &str,
    ) -> Result<Comment, DomainError> {
        self.find_owned(actor, comment_id, "edit").await?;

        let comment = self
            .comments
            .update_content(comment_id, content.trim())
            .await
            .map_err(DomainError::database("update"))?;

        tracing::info!(comment_id, actor_id = actor.id, "Comment updated");
        Ok(comment)
    }

    /// Soft-delete a comment. Its replies stay in storage but are hidden.
    pub async fn delete(&self, actor: &User, comment_id: i32) -> Result<(), DomainError> {
        self.find_owned(actor, comment_id, "delete").await?;

        self.comments
            .soft_delete(comment_id)
            .await
            .map_err(DomainError::database("delete"))?;

        tracing::info!(comment_id, actor_id = actor.id, "Comment deleted");
        Ok(())
    }

    async fn check_parent(&self, post_id: i32, parent_id: i32) -> Result<(), DomainError> {
        let parent = self.comments.find_by_id(parent_id).await?.ok_or_else(|| {
            DomainError::not_found(
                format!("Parent comment with id {parent_id} was not found."),
                json!({ "parent_id": parent_id }),
            )
        })?;

        if parent.is_deleted {
            return Err(DomainError::conflict(
                format!("Parent comment with id {parent_id} has been deleted."),
                json!({ "parent_id": parent_id }),
            ));
        }

        if parent.post_id != post_id {
            return Err(DomainError::permission_denied(
                "Parent comment belongs to a different post",
                json!({
                    "parent_id": parent_id,
                    "parent_post_id": parent.post_id,
                    "post_id": post_id,
                }),
            ));
        }

        if self.depth(&parent).await? >= MAX_REPLY_DEPTH {
            return Err(DomainError::validation(
                "Maximum reply depth reached",
                json!({ "parent_id": parent_id, "max_depth": MAX_REPLY_DEPTH }),
            ));
        }

        Ok(())
    }

    /// Number of ancestors above `comment`. The walk stops once the limit is
    /// exceeded, so a corrupted cycle cannot loop forever.
    async fn depth(&self, comment: &Comment) -> Result<usize, DomainError> {
        let mut depth = 0;
        let mut next = comment.parent_id;
        while let Some(ancestor) = next {
            depth += 1;
            if depth > MAX_REPLY_DEPTH {
                break;
            }
            next = self.comments.parent_of(ancestor).await?;
        }
        Ok(depth)
    }

    async fn find_owned(
        &self,
        actor: &User,
        comment_id: i32,
        action: &str,
    ) -> Result<Comment, DomainError> {
        let comment = self.comments.find_by_id(comment_id).await?.ok_or_else(|| {
            DomainError::not_found(
                format!("Comment with id {comment_id} was not found."),
                json!({ "comment_id": comment_id }),
            )
        })?;

        if comment.is_deleted {
            return Err(Self::gone(comment_id));
        }

        if !actor.can_modify(comment.author_id) {
            return Err(DomainError::permission_denied(
                format!("You are not allowed to {action} this comment."),
                json!({ "comment_id": comment_id, "actor_id": actor.id }),
            ));
        }

        Ok(comment)
    }

    fn gone(comment_id: i32) -> DomainError {
        DomainError::not_found(
            format!("Comment with id {comment_id} not found or deleted."),
            json!({ "comment_id": comment_id }),
        )
    }
}
