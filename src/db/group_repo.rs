/// Group repository
use crate::models::Group;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_group(
    pool: &PgPool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (id, title, slug, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// All groups ordered by title, for form choice lists.
pub async fn list_groups(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        ORDER BY title
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Delete a group; posts tagged to it keep existing with the reference
/// cleared. Both steps run in one transaction.
pub async fn delete_group(pool: &PgPool, group_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE posts SET group_id = NULL WHERE group_id = $1")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(group_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}
