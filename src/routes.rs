//! Route configuration
//!
//! Centralized route setup shared by `main` and the integration tests.
//! Fixed segments (`/new/`, `/follow/`, `/group/`) are registered before
//! the username-shaped catch-alls so matching stays unambiguous.

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::AppError;
use crate::handlers;
use crate::metrics;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/health", web::get().to(health_summary))
        .service(
            web::scope("/about")
                .route("/author/", web::get().to(handlers::about_author))
                .route("/tech/", web::get().to(handlers::about_tech)),
        )
        .service(
            web::scope("/auth")
                .route("/signup/", web::post().to(handlers::signup))
                .route("/login/", web::get().to(handlers::login_form))
                .route("/login/", web::post().to(handlers::login)),
        )
        .route("/", web::get().to(handlers::index))
        .route("/new/", web::get().to(handlers::new_post_form))
        .route("/new/", web::post().to(handlers::create_post))
        .route("/follow/", web::get().to(handlers::follow_index))
        .route("/group/{slug}/", web::get().to(handlers::group_posts))
        .route(
            "/{username}/follow/",
            web::get().to(handlers::profile_follow),
        )
        .route(
            "/{username}/unfollow/",
            web::get().to(handlers::profile_unfollow),
        )
        .route(
            "/{username}/{post_id}/edit/",
            web::get().to(handlers::edit_post_form),
        )
        .route(
            "/{username}/{post_id}/edit/",
            web::post().to(handlers::update_post),
        )
        .route(
            "/{username}/{post_id}/comment/",
            web::post().to(handlers::add_comment),
        )
        .route("/{username}/{post_id}/", web::get().to(handlers::post_view))
        .route("/{username}/", web::get().to(handlers::profile));
}

/// Path segments that fail to parse (for example a post id that is not a
/// UUID) resolve to 404, matching the URL-dispatch behavior of the rest
/// of the lookup failures.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::NotFound(err.to_string()).into())
}

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "lenta",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "lenta"
        })),
    }
}
