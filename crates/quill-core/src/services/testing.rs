//! In-memory port implementations for service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Comment, NewComment, NewPost, NewUser, Page, Post, PostChanges, PostQuery, User,
};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, CommentRepository, PasswordService, PostRepository, TokenClaims,
    TokenService, UserRepository,
};

const TOKEN_PREFIX: &str = "token-for:";

/// Tokens are the subject behind a fixed prefix.
pub struct FakeTokens;

impl TokenService for FakeTokens {
    fn generate_token(&self, subject: &str) -> Result<String, AuthError> {
        Ok(format!("{TOKEN_PREFIX}{subject}"))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let subject = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| AuthError::InvalidToken("unknown format".to_string()))?;
        let now = Utc::now().timestamp();
        Ok(TokenClaims {
            subject: subject.to_string(),
            issued_at: now,
            exp: now + self.expiration_seconds(),
        })
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

/// Reversible "hashing": `hashed$<password>`. Hashes behind `outdated`
/// verify as well but report that they need a rehash.
#[derive(Default)]
pub struct FakePasswords {
    outdated: Option<&'static str>,
}

impl FakePasswords {
    const PREFIX: &'static str = "hashed$";

    pub fn with_outdated_prefix(prefix: &'static str) -> Self {
        Self {
            outdated: Some(prefix),
        }
    }
}

impl PasswordService for FakePasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("{}{password}", Self::PREFIX))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let plain = hash
            .strip_prefix(Self::PREFIX)
            .or_else(|| self.outdated.and_then(|prefix| hash.strip_prefix(prefix)));
        Ok(plain == Some(password))
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        self.outdated.is_some_and(|prefix| hash.starts_with(prefix))
    }
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Users, posts and comments kept in vectors, with cascade on post delete.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn add_user(&self, email: &str, is_superuser: bool) -> User {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            email: email.to_string(),
            password_hash: format!("hashed${email}"),
            is_superuser,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        user
    }

    pub fn user(&self, id: i32) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn comment(&self, id: i32) -> Option<Comment> {
        let tables = self.tables.lock().unwrap();
        tables.comments.iter().find(|c| c.id == id).cloned()
    }

    pub fn force_password_hash(&self, id: i32, hash: &str) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.password_hash = hash.to_string();
        }
    }
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.user(id))
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().unwrap();
        tables.users.retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().any(|u| u.email == email))
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            email: user.email,
            password_hash: user.password_hash,
            is_superuser: user.is_superuser,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, id: i32, password_hash: &str) -> Result<(), RepoError> {
        self.force_password_hash(id, password_hash);
        Ok(())
    }

    async fn set_superuser(&self, id: i32, is_superuser: bool) -> Result<User, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepoError::NotFound)?;
        user.is_superuser = is_superuser;
        Ok(user.clone())
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().unwrap();
        tables.posts.retain(|p| p.id != id);
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn exists(&self, id: i32) -> Result<bool, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().any(|p| p.id == id))
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<i32>) -> Result<bool, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != exclude))
    }

    async fn list(&self, query: &PostQuery) -> Result<(Vec<Post>, u64), RepoError> {
        let tables = self.tables.lock().unwrap();
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut matches: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| match &needle {
                Some(needle) => {
                    p.title.to_lowercase().contains(needle)
                        || p.content.to_lowercase().contains(needle)
                }
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.page.skip as usize)
            .take(query.page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint(format!("slug {} is taken", post.slug)));
        }
        let now = Utc::now();
        let post = Post {
            id: tables.next_id(),
            author_id: post.author_id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(slug) = changes.slug {
            post.slug = slug;
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }
}

#[async_trait]
impl BaseRepository<Comment, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        Ok(self.comment(id))
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().unwrap();
        tables.comments.retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_active(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        Ok(self.comment(id).filter(|c| !c.is_deleted))
    }

    async fn parent_of(&self, id: i32) -> Result<Option<i32>, RepoError> {
        Ok(self.comment(id).and_then(|c| c.parent_id))
    }

    async fn list_top_level(
        &self,
        post_id: i32,
        page: Page,
    ) -> Result<(Vec<Comment>, u64), RepoError> {
        let tables = self.tables.lock().unwrap();
        let roots: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.parent_id.is_none() && !c.is_deleted)
            .cloned()
            .collect();
        let total = roots.len() as u64;
        let items = roots
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_replies(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.parent_id.is_some() && !c.is_deleted)
            .cloned()
            .collect())
    }

    async fn list_children(&self, parent_ids: &[i32]) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| !c.is_deleted && c.parent_id.is_some_and(|p| parent_ids.contains(&p)))
            .cloned()
            .collect())
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let comment = Comment {
            id: tables.next_id(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            content: comment.content,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_content(&self, id: i32, content: &str) -> Result<Comment, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn soft_delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) {
            comment.is_deleted = true;
        }
        Ok(())
    }
}
