/// Feed handlers: the index feed and the followed-authors feed.
use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use crate::cache::PageCache;
use crate::config::Config;
use crate::error::Result;
use crate::handlers::PageParam;
use crate::middleware::CurrentUser;
use crate::services::FeedService;
use crate::views;

/// All posts, newest first. The rendered page may be served from the
/// short-lived page cache; freshness within the TTL is not guaranteed.
pub async fn index(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<PageCache>,
    query: web::Query<PageParam>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let key = PageCache::key(req.path(), req.query_string());
    if let Some(body) = cache.get(&key) {
        return Ok(json_body(body));
    }

    let service = FeedService::new(pool.get_ref().clone(), &config.pagination);
    let (posts, page) = service.index_page(query.page.as_deref()).await?;
    let body = serde_json::to_string(&views::feed_view(&posts, &page))?;

    cache.put(key, body.clone());
    Ok(json_body(body))
}

/// Posts by the authors the caller follows.
pub async fn follow_index(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: CurrentUser,
    query: web::Query<PageParam>,
) -> Result<HttpResponse> {
    let service = FeedService::new(pool.get_ref().clone(), &config.pagination);
    let (posts, page) = service.followed_page(user.0, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(views::feed_view(&posts, &page)))
}

fn json_body(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::APPLICATION_JSON)
        .body(body)
}
