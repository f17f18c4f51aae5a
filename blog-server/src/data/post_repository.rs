use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostChanges};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Storage for blog posts.
///
/// `create` and `delete` also maintain the owner's `blogs` list; both writes
/// succeed or fail together.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError>;
    /// Returns `false` when no post had this id.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn list(&self) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    author: String,
    url: String,
    likes: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = DomainError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let likes = u32::try_from(row.likes).map_err(|_| {
            DomainError::Internal(format!("post {} has invalid likes {}", row.id, row.likes))
        })?;
        Ok(Self {
            id: row.id,
            title: row.title,
            author: row.author,
            url: row.url,
            likes,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, title, author, url, likes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.author)
        .bind(&post.url)
        .bind(i64::from(post.likes))
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation())
            {
                DomainError::UserNotFound(post.user_id)
            } else {
                error!("failed to create post: {}", e);
                DomainError::from(e)
            }
        })?;

        let linked = sqlx::query("UPDATE users SET blogs = array_append(blogs, $1) WHERE id = $2")
            .bind(post.id)
            .bind(post.user_id)
            .execute(&mut *tx)
            .await?;

        if linked.rows_affected() == 0 {
            warn!(post_id = %post.id, user_id = %post.user_id, "owner vanished, rolling back");
            tx.rollback().await?;
            return Err(DomainError::UserNotFound(post.user_id));
        }

        tx.commit().await?;

        info!(post_id = %post.id, user_id = %post.user_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, title, author, url, likes, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::from(e)
        })?;

        row.map(Post::try_from).transpose()
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                author = COALESCE($2, author),
                url = COALESCE($3, url),
                likes = COALESCE($4, likes),
                updated_at = $5
            WHERE id = $6
            RETURNING id, user_id, title, author, url, likes, created_at, updated_at
            "#,
        )
        .bind(changes.title)
        .bind(changes.author)
        .bind(changes.url)
        .bind(changes.likes.map(i64::from))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::from(e)
        })?;

        if row.is_some() {
            info!(post_id = %id, "post updated");
        }

        row.map(Post::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM posts WHERE id = $1 RETURNING user_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    error!("failed to delete post {}: {}", id, e);
                    DomainError::from(e)
                })?;

        let Some(owner) = owner else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE users SET blogs = array_remove(blogs, $1) WHERE id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(post_id = %id, "post deleted");
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, title, author, url, likes, created_at, updated_at
            FROM posts
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::from(e)
        })?;

        rows.into_iter().map(Post::try_from).collect()
    }
}
