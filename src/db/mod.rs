/// Database access layer
///
/// Repository free functions over `sqlx::PgPool`, one module per entity.
/// Relationship delete behavior (cascade vs null-out) is implemented as
/// explicit ordered statements inside a transaction in the delete paths.
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;
