//! Transactional behaviour of the Postgres repositories. These tests need a
//! live database and are skipped when `DATABASE_URL` is not set.

use blog_server::data::post_repository::{PostRepository, PostgresPostRepository};
use blog_server::data::user_repository::{PostgresUserRepository, UserRepository};
use blog_server::domain::error::DomainError;
use blog_server::domain::post::{NewPost, Post};
use blog_server::domain::user::User;
use blog_server::infrastructure::database::{create_pool, run_migrations};
use sqlx::PgPool;
use uuid::Uuid;

async fn pool() -> Option<PgPool> {
    let Some(url) = std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
    else {
        eprintln!("DATABASE_URL is not set; skipping");
        return None;
    };
    let pool = create_pool(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    Some(pool)
}

async fn owner(users: &PostgresUserRepository) -> User {
    let username = format!("owner-{}", Uuid::new_v4());
    users
        .create(User::new(username, None, "$argon2id$hash".into()))
        .await
        .unwrap()
}

fn draft(user_id: Uuid) -> Post {
    Post::new(
        user_id,
        NewPost {
            title: "Go To Statement Considered Harmful".into(),
            author: "Edsger W. Dijkstra".into(),
            url: "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html"
                .into(),
            likes: 5,
        },
    )
}

#[tokio::test]
async fn create_links_and_delete_unlinks_owner() {
    let Some(pool) = pool().await else { return };
    let users = PostgresUserRepository::new(pool.clone());
    let posts = PostgresPostRepository::new(pool);
    let owner = owner(&users).await;

    let post = posts.create(draft(owner.id)).await.unwrap();
    let linked = users.find_by_id(owner.id).await.unwrap().unwrap();
    assert_eq!(linked.blogs, vec![post.id]);

    assert!(posts.delete(post.id).await.unwrap());
    assert!(posts.find_by_id(post.id).await.unwrap().is_none());
    let unlinked = users.find_by_id(owner.id).await.unwrap().unwrap();
    assert!(unlinked.blogs.is_empty());
}

#[tokio::test]
async fn create_for_missing_owner_leaves_no_post_behind() {
    let Some(pool) = pool().await else { return };
    let posts = PostgresPostRepository::new(pool);
    let ghost = Uuid::new_v4();
    let post = draft(ghost);

    let err = posts.create(post.clone()).await.unwrap_err();

    assert!(matches!(err, DomainError::UserNotFound(id) if id == ghost));
    assert!(posts.find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_unknown_post_reports_false() {
    let Some(pool) = pool().await else { return };
    let posts = PostgresPostRepository::new(pool);

    assert!(!posts.delete(Uuid::new_v4()).await.unwrap());
}
