use migration::{Migrator, MigratorTrait};
use quill_core::domain::{NewComment, NewPost, NewUser, Page, PostChanges, PostQuery};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
use sea_orm::DbConn;

use super::{
    DatabaseConfig, SqlCommentRepository, SqlPostRepository, SqlUserRepository, connect,
};

async fn setup() -> DbConn {
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn seed_user(db: &DbConn, email: &str) -> i32 {
    SqlUserRepository::new(db.clone())
        .create(NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            is_superuser: false,
        })
        .await
        .unwrap()
        .id
}

async fn seed_post(db: &DbConn, author_id: i32, title: &str, slug: &str) -> i32 {
    SqlPostRepository::new(db.clone())
        .create(NewPost {
            author_id,
            title: title.to_string(),
            slug: slug.to_string(),
            content: format!("Content of {title}"),
        })
        .await
        .unwrap()
        .id
}

async fn seed_comment(db: &DbConn, post_id: i32, author_id: i32, parent_id: Option<i32>) -> i32 {
    SqlCommentRepository::new(db.clone())
        .create(NewComment {
            post_id,
            author_id,
            parent_id,
            content: "comment".to_string(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_user_email_is_unique() {
    let db = setup().await;
    let users = SqlUserRepository::new(db.clone());
    seed_user(&db, "writer@example.com").await;

    assert!(users.email_exists("writer@example.com").await.unwrap());
    let err = users
        .create(NewUser {
            email: "writer@example.com".to_string(),
            password_hash: "other".to_string(),
            is_superuser: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Constraint(_)));
}

#[tokio::test]
async fn test_promote_and_rehash_user() {
    let db = setup().await;
    let users = SqlUserRepository::new(db.clone());
    let id = seed_user(&db, "writer@example.com").await;

    let promoted = users.set_superuser(id, true).await.unwrap();
    users.update_password_hash(id, "new-hash").await.unwrap();

    assert!(promoted.is_superuser);
    let stored = users.find_by_email("writer@example.com").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "new-hash");
}

#[tokio::test]
async fn test_slug_taken_ignores_excluded_post() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;
    let post_id = seed_post(&db, author, "Hello", "hello").await;
    let posts = SqlPostRepository::new(db.clone());

    assert!(posts.slug_taken("hello", None).await.unwrap());
    assert!(!posts.slug_taken("hello", Some(post_id)).await.unwrap());
    assert!(!posts.slug_taken("other", None).await.unwrap());
}

#[tokio::test]
async fn test_list_posts_newest_first_with_search() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;
    seed_post(&db, author, "Rust ownership", "rust-ownership").await;
    seed_post(&db, author, "Gardening", "gardening").await;
    seed_post(&db, author, "Async RUST", "async-rust").await;
    let posts = SqlPostRepository::new(db.clone());

    let (all, total) = posts.list(&PostQuery::default()).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(all[0].slug, "async-rust");

    let (found, total) = posts
        .list(&PostQuery {
            page: Page { skip: 0, limit: 1 },
            search: Some("rust".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].slug, "async-rust");
}

#[tokio::test]
async fn test_update_post_changes_only_given_fields() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;
    let post_id = seed_post(&db, author, "Draft", "draft").await;
    let posts = SqlPostRepository::new(db.clone());

    let updated = posts
        .update(post_id, PostChanges {
            title: Some("Final".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.slug, "draft");
    assert!(updated.updated_at >= updated.created_at);
}

#[tokio::test]
async fn test_deleting_post_cascades_to_comments() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;
    let post_id = seed_post(&db, author, "Doomed", "doomed").await;
    let comment_id = seed_comment(&db, post_id, author, None).await;
    let posts = SqlPostRepository::new(db.clone());
    let comments = SqlCommentRepository::new(db.clone());

    BaseRepository::<quill_core::domain::Post, i32>::delete(&posts, post_id)
        .await
        .unwrap();

    let found: Option<quill_core::domain::Comment> = comments.find_by_id(comment_id).await.unwrap();
    assert!(found.is_none());
    assert!(!posts.exists(post_id).await.unwrap());
}

#[tokio::test]
async fn test_soft_deleted_comments_are_hidden_from_reads() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;
    let post_id = seed_post(&db, author, "Thread", "thread").await;
    let root = seed_comment(&db, post_id, author, None).await;
    let reply = seed_comment(&db, post_id, author, Some(root)).await;
    let other_root = seed_comment(&db, post_id, author, None).await;
    let comments = SqlCommentRepository::new(db.clone());

    comments.soft_delete(other_root).await.unwrap();

    assert!(comments.find_active(other_root).await.unwrap().is_none());
    let raw: Option<quill_core::domain::Comment> = comments.find_by_id(other_root).await.unwrap();
    assert!(raw.unwrap().is_deleted);

    let (roots, total) = comments.list_top_level(post_id, Page::default()).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(roots[0].id, root);

    let replies = comments.list_replies(post_id).await.unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, reply);
}

#[tokio::test]
async fn test_parent_of_walks_one_level() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;
    let post_id = seed_post(&db, author, "Thread", "thread").await;
    let root = seed_comment(&db, post_id, author, None).await;
    let reply = seed_comment(&db, post_id, author, Some(root)).await;
    let comments = SqlCommentRepository::new(db.clone());

    assert_eq!(comments.parent_of(reply).await.unwrap(), Some(root));
    assert_eq!(comments.parent_of(root).await.unwrap(), None);
    assert_eq!(comments.parent_of(9999).await.unwrap(), None);
}

#[tokio::test]
async fn test_update_comment_content() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;
    let post_id = seed_post(&db, author, "Thread", "thread").await;
    let id = seed_comment(&db, post_id, author, None).await;
    let comments = SqlCommentRepository::new(db.clone());

    let updated = comments.update_content(id, "edited").await.unwrap();

    assert_eq!(updated.content, "edited");
    assert!(!updated.is_deleted);
}

#[tokio::test]
async fn test_list_children_skips_deleted_and_other_parents() {
    let db = setup().await;
    let comments = SqlCommentRepository::new(db.clone());
    let author = seed_user(&db, "writer@example.com").await;
    let post = seed_post(&db, author, "Thread", "thread").await;
    let root = seed_comment(&db, post, author, None).await;
    let other = seed_comment(&db, post, author, None).await;
    let kept = seed_comment(&db, post, author, Some(root)).await;
    let hidden = seed_comment(&db, post, author, Some(root)).await;
    let elsewhere = seed_comment(&db, post, author, Some(other)).await;
    comments.soft_delete(hidden).await.unwrap();

    let children = comments.list_children(&[root]).await.unwrap();
    let ids: Vec<i32> = children.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![kept]);

    let both = comments.list_children(&[root, other]).await.unwrap();
    assert_eq!(both.len(), 2);
    assert!(both.iter().any(|c| c.id == elsewhere));

    assert!(comments.list_children(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_on_missing_post_violates_constraint() {
    let db = setup().await;
    let author = seed_user(&db, "writer@example.com").await;

    let err = SqlCommentRepository::new(db.clone())
        .create(NewComment {
            post_id: 4242,
            author_id: author,
            parent_id: None,
            content: "orphan".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Constraint(_)));
}

