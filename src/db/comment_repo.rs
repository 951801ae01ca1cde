/// Comment repository
use crate::models::{Comment, CommentDetail};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, text, created, author_id, post_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, text, created, author_id, post_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(text)
    .bind(Utc::now())
    .bind(author_id)
    .bind(post_id)
    .fetch_one(pool)
    .await
}

/// Comments on a post in creation order, oldest first.
pub async fn list_by_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentDetail>, sqlx::Error> {
    sqlx::query_as::<_, CommentDetail>(
        r#"
        SELECT c.id, c.text, c.created, c.author_id, u.username AS author_username, c.post_id
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.created ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}
