//! Protected routes must redirect unauthenticated callers into the login
//! flow before any side effect can happen.
//!
//! The pool below is created lazily and points at a closed port, so any
//! handler that reached the database would answer 500 instead of the
//! asserted redirect; a passing test proves no storage call was made.

use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use sqlx::postgres::PgPoolOptions;

use lenta::cache::PageCache;
use lenta::config::{
    AppConfig, AuthConfig, CacheConfig, Config, CorsConfig, DatabaseConfig, MediaConfig,
    PaginationConfig,
};
use lenta::media::MediaStorage;
use lenta::routes;

fn test_config() -> Config {
    Config {
        app: AppConfig {
            env: "test".into(),
            host: "127.0.0.1".into(),
            port: 8080,
        },
        cors: CorsConfig {
            allowed_origins: "*".into(),
        },
        database: DatabaseConfig {
            url: "postgresql://127.0.0.1:1/lenta".into(),
            max_connections: 1,
        },
        pagination: PaginationConfig {
            page_size: 10,
            group_feed_window: 10,
        },
        cache: CacheConfig { page_ttl_secs: 20 },
        media: MediaConfig {
            root: "media".into(),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".into(),
            token_ttl_hours: 1,
            login_path: "/auth/login/".into(),
        },
    }
}

macro_rules! test_app {
    () => {{
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://127.0.0.1:1/lenta")
            .expect("lazy pool");
        let media_root = std::env::temp_dir().join("lenta-test-media");
        test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(test_config()))
                .app_data(web::Data::new(PageCache::new(Duration::from_secs(20))))
                .app_data(web::Data::new(MediaStorage::new(media_root)))
                .app_data(routes::path_config())
                .configure(routes::configure_routes),
        )
        .await
    }};
}

fn location(response: &actix_web::dev::ServiceResponse) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[actix_web::test]
async fn new_post_form_requires_login() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/new/").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=%2Fnew%2F");
}

#[actix_web::test]
async fn unauthenticated_comment_post_is_dropped() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/admin2/5a9e5f4e-3b1a-4c9d-9e5f-4e3b1a4c9d9e/comment/")
        .set_form(vec![("text", "Тестовый комментарий")])
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("/auth/login/?next="));
}

#[actix_web::test]
async fn followed_feed_requires_login() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/follow/").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=%2Ffollow%2F");
}

#[actix_web::test]
async fn follow_and_unfollow_require_login() {
    let app = test_app!();
    for path in ["/admin2/follow/", "/admin2/unfollow/"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let response = test::call_service(&app, req).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(location(&response).starts_with("/auth/login/?next="));
    }
}

#[actix_web::test]
async fn malformed_post_id_is_not_found() {
    let app = test_app!();
    let req = test::TestRequest::get()
        .uri("/admin2/not-a-post-id/")
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn about_pages_are_public() {
    let app = test_app!();
    for path in ["/about/author/", "/about/tech/"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
