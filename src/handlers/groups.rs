/// Group feed handler.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;
use crate::handlers::PageParam;
use crate::services::FeedService;
use crate::views::{self, GroupFeedView, GroupView};

pub async fn group_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    slug: web::Path<String>,
    query: web::Query<PageParam>,
) -> Result<HttpResponse> {
    let service = FeedService::new(pool.get_ref().clone(), &config.pagination);
    let (group, posts, page) = service
        .group_page(&slug, query.page.as_deref())
        .await?;

    let view = views::feed_view(&posts, &page);
    Ok(HttpResponse::Ok().json(GroupFeedView {
        group: GroupView::from(&group),
        posts: view.posts,
        page: view.page,
    }))
}
