use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Upper bound on the index listing.
pub const LIST_LIMIT: i64 = 40;

/// Post record in the database. The text columns are nullable; a post is
/// valid with only an author and a cover image.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Post joined with the author's display name, for read endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Post {
    pub async fn create(
        db: &PgPool,
        author_id: Uuid,
        title: Option<String>,
        summary: Option<String>,
        content: Option<String>,
        cover_image: &str,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, summary, content, cover_image, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, summary, content, cover_image, author_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(summary)
        .bind(content)
        .bind(cover_image)
        .bind(author_id)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, summary, content, cover_image, author_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    /// Replace only the provided fields; absent ones keep their value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<String>,
        summary: Option<String>,
        content: Option<String>,
        cover_image: Option<String>,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                content = COALESCE($4, content),
                cover_image = COALESCE($5, cover_image),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, summary, content, cover_image, author_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(summary)
        .bind(content)
        .bind(cover_image)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    /// Remove by id; returns false when no row matched.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl PostWithAuthor {
    /// Newest first, capped at LIST_LIMIT. A fresh query per call.
    pub async fn list_recent(db: &PgPool) -> anyhow::Result<Vec<PostWithAuthor>> {
        let rows = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.title, p.summary, p.content, p.cover_image,
                   p.author_id, u.name AS author_name, p.created_at, p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(LIST_LIMIT)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<PostWithAuthor>> {
        let row = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.title, p.summary, p.content, p.cover_image,
                   p.author_id, u.name AS author_name, p.created_at, p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
