/// Author profile handler.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;
use crate::handlers::PageParam;
use crate::middleware::MaybeUser;
use crate::services::FeedService;
use crate::views::{self, ProfileView, UserView};

pub async fn profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    viewer: MaybeUser,
    username: web::Path<String>,
    query: web::Query<PageParam>,
) -> Result<HttpResponse> {
    let service = FeedService::new(pool.get_ref().clone(), &config.pagination);
    let data = service
        .profile_page(&username, query.page.as_deref(), viewer.0)
        .await?;

    let feed = views::feed_view(&data.posts, &data.page);
    Ok(HttpResponse::Ok().json(ProfileView {
        author: UserView::from(&data.author),
        following: data.following,
        follows: data.follows.iter().map(UserView::from).collect(),
        followers: data.followers.iter().map(UserView::from).collect(),
        posts: feed.posts,
        page: feed.page,
    }))
}
