/// Data models for lenta
///
/// Row types for the five entities (User, Group, Post, Comment, Follow)
/// plus the joined projections the feed queries return.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: Uuid,
    pub post_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Post row joined with its author and (optional) group for rendering.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostDetail {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_id: Option<Uuid>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub image: Option<String>,
}

/// Comment row joined with its author for rendering.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentDetail {
    pub id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub post_id: Option<Uuid>,
}
