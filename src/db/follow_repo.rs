/// Follow repository
///
/// The (user_id, author_id) pair is unique and self-follows are rejected
/// by a check constraint, so a racing duplicate insert resolves in the
/// database, not in application code. All follow-row writes in this crate
/// live in this module.
use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent create; returns true if a new row was inserted.
pub async fn create_follow(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (id, user_id, author_id, created_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (user_id, author_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent delete; returns true if a row was removed.
pub async fn delete_follow(
    pool: &PgPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE user_id = $1 AND author_id = $2
        "#,
    )
    .bind(user_id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

pub async fn exists(pool: &PgPool, user_id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(pool)
    .await
}

/// Users the given user follows.
pub async fn list_following(pool: &PgPool, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.first_name, u.last_name, u.password_hash, u.created_at
        FROM users u
        JOIN follows f ON f.author_id = u.id
        WHERE f.user_id = $1
        ORDER BY u.username
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Users following the given author.
pub async fn list_followers(pool: &PgPool, author_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.first_name, u.last_name, u.password_hash, u.created_at
        FROM users u
        JOIN follows f ON f.user_id = u.id
        WHERE f.author_id = $1
        ORDER BY u.username
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await
}
