use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity. Comments form a tree through `parent_id`; a comment with
/// no parent is a top-level comment on its post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub parent_id: Option<i32>,
    pub content: String,
    /// Soft-delete marker. Deleted comments stay in storage but are hidden from reads.
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i32,
    pub author_id: i32,
    pub parent_id: Option<i32>,
    pub content: String,
}

/// A comment together with its (active) replies, recursively.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<CommentThread>,
}

impl CommentThread {
    /// A thread with no replies.
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    /// Attach `replies` under each of `roots`.
    ///
    /// `replies` may contain comments of any depth and in any order; the
    /// relative order of siblings is preserved. Replies whose ancestor chain
    /// does not lead to one of the roots are dropped.
    pub fn assemble(roots: Vec<Comment>, replies: Vec<Comment>) -> Vec<CommentThread> {
        let mut children: HashMap<i32, Vec<Comment>> = HashMap::new();
        for reply in replies {
            if let Some(parent_id) = reply.parent_id {
                children.entry(parent_id).or_default().push(reply);
            }
        }

        roots
            .into_iter()
            .map(|root| Self::grow(root, &mut children))
            .collect()
    }

    fn grow(comment: Comment, children: &mut HashMap<i32, Vec<Comment>>) -> CommentThread {
        let replies = children
            .remove(&comment.id)
            .unwrap_or_default()
            .into_iter()
            .map(|child| Self::grow(child, children))
            .collect();

        CommentThread { comment, replies }
    }
}
