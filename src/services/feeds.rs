/// Feed assembly
///
/// Every feed is the same shape: count, clamp the requested page, fetch
/// one window of joined post rows. The group feed additionally caps the
/// considered posts at a fixed window before pagination.
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::db::{follow_repo, group_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{Group, PostDetail, User};
use crate::pagination::{Page, Paginator};

#[derive(Clone)]
pub struct FeedService {
    pool: PgPool,
    page_size: i64,
    group_feed_window: i64,
}

/// Everything the author profile page shows.
pub struct ProfileData {
    pub author: User,
    pub posts: Vec<PostDetail>,
    pub page: Page,
    pub following: bool,
    pub follows: Vec<User>,
    pub followers: Vec<User>,
}

impl FeedService {
    pub fn new(pool: PgPool, config: &PaginationConfig) -> Self {
        Self {
            pool,
            page_size: config.page_size,
            group_feed_window: config.group_feed_window,
        }
    }

    pub async fn index_page(&self, raw_page: Option<&str>) -> Result<(Vec<PostDetail>, Page)> {
        let total = post_repo::count_posts(&self.pool).await?;
        let page = Paginator::new(total, self.page_size).page_from_param(raw_page);
        let posts = self
            .fetch(page, |limit, offset| {
                post_repo::list_posts(&self.pool, limit, offset)
            })
            .await?;
        Ok((posts, page))
    }

    pub async fn group_page(
        &self,
        slug: &str,
        raw_page: Option<&str>,
    ) -> Result<(Group, Vec<PostDetail>, Page)> {
        let group = group_repo::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{}'", slug)))?;

        let total = post_repo::count_posts_by_group(&self.pool, group.id)
            .await?
            .min(self.group_feed_window);
        let page = Paginator::new(total, self.page_size).page_from_param(raw_page);
        let posts = self
            .fetch(page, |limit, offset| {
                post_repo::list_posts_by_group(&self.pool, group.id, limit, offset)
            })
            .await?;

        Ok((group, posts, page))
    }

    pub async fn profile_page(
        &self,
        username: &str,
        raw_page: Option<&str>,
        viewer: Option<Uuid>,
    ) -> Result<ProfileData> {
        let author = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

        let total = post_repo::count_posts_by_author(&self.pool, author.id).await?;
        let page = Paginator::new(total, self.page_size).page_from_param(raw_page);
        let posts = self
            .fetch(page, |limit, offset| {
                post_repo::list_posts_by_author(&self.pool, author.id, limit, offset)
            })
            .await?;

        let following = match viewer {
            Some(user_id) if user_id != author.id => {
                follow_repo::exists(&self.pool, user_id, author.id).await?
            }
            _ => false,
        };
        let follows = follow_repo::list_following(&self.pool, author.id).await?;
        let followers = follow_repo::list_followers(&self.pool, author.id).await?;

        Ok(ProfileData {
            author,
            posts,
            page,
            following,
            follows,
            followers,
        })
    }

    /// Posts by the authors the caller follows; an empty follow list is
    /// an empty page, not an error.
    pub async fn followed_page(
        &self,
        user_id: Uuid,
        raw_page: Option<&str>,
    ) -> Result<(Vec<PostDetail>, Page)> {
        let total = post_repo::count_followed_posts(&self.pool, user_id).await?;
        let page = Paginator::new(total, self.page_size).page_from_param(raw_page);
        let posts = self
            .fetch(page, |limit, offset| {
                post_repo::list_followed_posts(&self.pool, user_id, limit, offset)
            })
            .await?;
        Ok((posts, page))
    }

    async fn fetch<F, Fut>(&self, page: Page, query: F) -> Result<Vec<PostDetail>>
    where
        F: FnOnce(i64, i64) -> Fut,
        Fut: std::future::Future<Output = std::result::Result<Vec<PostDetail>, sqlx::Error>>,
    {
        if page.limit == 0 {
            return Ok(Vec::new());
        }
        Ok(query(page.limit, page.offset).await?)
    }
}
