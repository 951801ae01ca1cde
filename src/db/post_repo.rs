/// Post repository
///
/// Feed queries return `PostDetail` (post joined with author username and
/// group columns) so handlers never issue follow-up lookups per row.
use crate::models::{Post, PostDetail};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const DETAIL_COLUMNS: &str = r#"
    p.id, p.text, p.pub_date, p.author_id, u.username AS author_username,
    p.group_id, g.title AS group_title, g.slug AS group_slug, p.image
"#;

fn detail_query(where_clause: &str, tail: &str) -> String {
    format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        {where_clause}
        ORDER BY p.pub_date DESC
        {tail}
        "#
    )
}

/// Create a new post with a server-assigned publication timestamp.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image: Option<&str>,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, text, pub_date, author_id, group_id, image)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, text, pub_date, author_id, group_id, image
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(text)
    .bind(Utc::now())
    .bind(author_id)
    .bind(group_id)
    .bind(image)
    .fetch_one(pool)
    .await
}

/// Update a post's editable fields; id and pub_date never change.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image: Option<&str>,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET text = $1, group_id = $2, image = $3
        WHERE id = $4
        RETURNING id, text, pub_date, author_id, group_id, image
        "#,
    )
    .bind(text)
    .bind(group_id)
    .bind(image)
    .bind(post_id)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<PostDetail>, sqlx::Error> {
    sqlx::query_as::<_, PostDetail>(&detail_query("WHERE p.id = $1", ""))
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id_and_author(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
) -> Result<Option<PostDetail>, sqlx::Error> {
    sqlx::query_as::<_, PostDetail>(&detail_query("WHERE p.id = $1 AND p.author_id = $2", ""))
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(pool)
        .await
}

pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
}

/// All posts newest-first, one feed page at a time.
pub async fn list_posts(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    sqlx::query_as::<_, PostDetail>(&detail_query("", "LIMIT $1 OFFSET $2"))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_posts_by_group(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await
}

pub async fn list_posts_by_group(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    sqlx::query_as::<_, PostDetail>(&detail_query("WHERE p.group_id = $1", "LIMIT $2 OFFSET $3"))
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn count_posts_by_author(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await
}

pub async fn list_posts_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    sqlx::query_as::<_, PostDetail>(&detail_query("WHERE p.author_id = $1", "LIMIT $2 OFFSET $3"))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// The author's full post list, for the single-post view sidebar.
pub async fn list_all_posts_by_author(
    pool: &PgPool,
    author_id: Uuid,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    sqlx::query_as::<_, PostDetail>(&detail_query("WHERE p.author_id = $1", ""))
        .bind(author_id)
        .fetch_all(pool)
        .await
}

/// Posts by authors the given user follows.
pub async fn count_followed_posts(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM posts p
        WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn list_followed_posts(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    sqlx::query_as::<_, PostDetail>(&detail_query(
        "WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = $1)",
        "LIMIT $2 OFFSET $3",
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Delete a post together with its comments, in one transaction.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM comments WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}
