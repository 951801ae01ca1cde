/// Post service - creation, edits, and the single-post page
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::metrics::POSTS_CREATED_TOTAL;
use crate::models::{CommentDetail, Post, PostDetail, User};

#[derive(Clone)]
pub struct PostService {
    pool: PgPool,
}

/// Everything the single-post page shows.
pub struct PostPageData {
    pub author: User,
    pub post: PostDetail,
    pub comments: Vec<CommentDetail>,
    pub author_posts: Vec<PostDetail>,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post> {
        let post = post_repo::create_post(&self.pool, author_id, text, group_id, image).await?;
        POSTS_CREATED_TOTAL.inc();
        Ok(post)
    }

    /// Mutate an existing post's text, group, and image; the identifier
    /// and publication timestamp stay as they were.
    pub async fn update(
        &self,
        post_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post> {
        Ok(post_repo::update_post(&self.pool, post_id, text, group_id, image).await?)
    }

    /// Resolve a post by author username and id, 404 when either half is
    /// missing or the post belongs to someone else.
    pub async fn resolve(&self, username: &str, post_id: Uuid) -> Result<(User, PostDetail)> {
        let author = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

        let post = post_repo::find_by_id_and_author(&self.pool, post_id, author.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("post '{}' by '{}'", post_id, username))
            })?;

        Ok((author, post))
    }

    pub async fn post_page(&self, username: &str, post_id: Uuid) -> Result<PostPageData> {
        let (author, post) = self.resolve(username, post_id).await?;
        let comments = comment_repo::list_by_post(&self.pool, post.id).await?;
        let author_posts = post_repo::list_all_posts_by_author(&self.pool, author.id).await?;

        Ok(PostPageData {
            author,
            post,
            comments,
            author_posts,
        })
    }
}
