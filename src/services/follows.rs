/// Follow rules
///
/// Self-follow is silently ignored and duplicate follows/unfollows are
/// no-ops; the unique pair constraint in storage settles races.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::follow_repo;
use crate::error::Result;
use crate::metrics::FOLLOW_CHANGES_TOTAL;
use crate::models::User;

#[derive(Clone)]
pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns true if a new follow row was created.
    pub async fn follow(&self, follower: Uuid, author: &User) -> Result<bool> {
        if follower == author.id {
            return Ok(false);
        }

        let created = follow_repo::create_follow(&self.pool, follower, author.id).await?;
        if created {
            FOLLOW_CHANGES_TOTAL.with_label_values(&["follow"]).inc();
        }
        Ok(created)
    }

    /// Returns true if an existing follow row was removed.
    pub async fn unfollow(&self, follower: Uuid, author: &User) -> Result<bool> {
        let removed = follow_repo::delete_follow(&self.pool, follower, author.id).await?;
        if removed {
            FOLLOW_CHANGES_TOTAL.with_label_values(&["unfollow"]).inc();
        }
        Ok(removed)
    }
}
