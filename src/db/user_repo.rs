/// User repository - handles all database operations for users
use crate::models::User;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new user in the database
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    first_name: &str,
    last_name: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, first_name, last_name, password_hash, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, username, first_name, last_name, password_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Find a user by username
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, first_name, last_name, password_hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, first_name, last_name, password_hash, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a user and everything hanging off it.
///
/// Deleting the author deletes their posts and comments; comments left by
/// other users on the deleted posts go too. Follow rows on either side of
/// the relation are removed. All steps run in one transaction.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM follows WHERE user_id = $1 OR author_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM comments WHERE author_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM comments WHERE post_id IN (SELECT id FROM posts WHERE author_id = $1)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM posts WHERE author_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}
