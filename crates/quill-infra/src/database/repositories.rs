//! SeaORM repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use quill_core::domain::{
    Comment, NewComment, NewPost, NewUser, Page, Post, PostChanges, PostQuery, User,
};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::base::{SqlRepository, repo_err};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// SQL user repository.
pub type SqlUserRepository = SqlRepository<UserEntity>;

/// SQL post repository.
pub type SqlPostRepository = SqlRepository<PostEntity>;

/// SQL comment repository.
pub type SqlCommentRepository = SqlRepository<CommentEntity>;

/// Mask the local part of an email so logs don't carry PII.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> LikeExpr {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: NotSet,
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            is_superuser: Set(user.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn update_password_hash(&self, id: i32, password_hash: &str) -> Result<(), RepoError> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn set_superuser(&self, id: i32, is_superuser: bool) -> Result<User, RepoError> {
        let mut model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?
            .into_active_model();

        model.is_superuser = Set(is_superuser);
        model.updated_at = Set(Utc::now());

        let model = model.update(&self.db).await.map_err(repo_err)?;
        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists(&self, id: i32) -> Result<bool, RepoError> {
        let count = PostEntity::find()
            .filter(post::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(count > 0)
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<i32>) -> Result<bool, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            query = query.filter(post::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await.map_err(repo_err)?;
        Ok(count > 0)
    }

    async fn list(&self, query: &PostQuery) -> Result<(Vec<Post>, u64), RepoError> {
        let mut select = PostEntity::find();
        if let Some(search) = query.search.as_deref() {
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                            .like(contains_pattern(search)),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::Content)))
                            .like(contains_pattern(search)),
                    ),
            );
        }

        let total = select.clone().count(&self.db).await.map_err(repo_err)?;
        let items = select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(query.page.skip)
            .limit(query.page.limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok((items.into_iter().map(Into::into).collect(), total))
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let model = post::ActiveModel {
            id: NotSet,
            author_id: Set(post.author_id),
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?
            .into_active_model();

        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(content) = changes.content {
            model.content = Set(content);
        }
        if let Some(slug) = changes.slug {
            model.slug = Set(slug);
        }
        model.updated_at = Set(Utc::now());

        let model = model.update(&self.db).await.map_err(repo_err)?;
        Ok(model.into())
    }
}

#[async_trait]
impl CommentRepository for SqlCommentRepository {
    async fn find_active(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .filter(comment::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn parent_of(&self, id: i32) -> Result<Option<i32>, RepoError> {
        let parent = CommentEntity::find_by_id(id)
            .select_only()
            .column(comment::Column::ParentId)
            .into_tuple::<Option<i32>>()
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(parent.flatten())
    }

    async fn list_top_level(
        &self,
        post_id: i32,
        page: Page,
    ) -> Result<(Vec<Comment>, u64), RepoError> {
        let select = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::ParentId.is_null())
            .filter(comment::Column::IsDeleted.eq(false));

        let total = select.clone().count(&self.db).await.map_err(repo_err)?;
        let items = select
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok((items.into_iter().map(Into::into).collect(), total))
    }

    async fn list_replies(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let items = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::ParentId.is_not_null())
            .filter(comment::Column::IsDeleted.eq(false))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    async fn list_children(&self, parent_ids: &[i32]) -> Result<Vec<Comment>, RepoError> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = CommentEntity::find()
            .filter(comment::Column::ParentId.is_in(parent_ids.iter().copied()))
            .filter(comment::Column::IsDeleted.eq(false))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let now = Utc::now();
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(comment.post_id),
            author_id: Set(comment.author_id),
            parent_id: Set(comment.parent_id),
            content: Set(comment.content),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn update_content(&self, id: i32, content: &str) -> Result<Comment, RepoError> {
        let mut model = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?
            .into_active_model();

        model.content = Set(content.to_string());
        model.updated_at = Set(Utc::now());

        let model = model.update(&self.db).await.map_err(repo_err)?;
        Ok(model.into())
    }

    async fn soft_delete(&self, id: i32) -> Result<(), RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::IsDeleted, Expr::value(true))
            .col_expr(comment::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
