/// Comment service
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::metrics::COMMENTS_CREATED_TOTAL;
use crate::models::{Comment, PostDetail};

#[derive(Clone)]
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach a comment to a post resolved by id alone; the returned post
    /// tells the caller where to redirect.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<(PostDetail, Comment)> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post '{}'", post_id)))?;

        let comment = comment_repo::create_comment(&self.pool, post.id, author_id, text).await?;
        COMMENTS_CREATED_TOTAL.inc();

        Ok((post, comment))
    }
}
