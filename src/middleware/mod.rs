/// Request identity extraction
///
/// Caller identity is an explicit handler argument, never ambient state:
/// `CurrentUser` for protected routes (failure redirects into the login
/// flow with a `next` return target) and `MaybeUser` where anonymous
/// access is fine. Tokens are read from the `Authorization: Bearer`
/// header or the `session` cookie.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth;

/// Identity of an authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Uuid);

/// Identity of a caller that may be anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Uuid>);

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    req.cookie("session").map(|c| c.value().to_string())
}

fn authenticated_user(req: &HttpRequest) -> Option<Uuid> {
    let config = req.app_data::<web::Data<Config>>()?;
    let token = session_token(req)?;
    auth::decode_token(&config.auth.jwt_secret, &token)
}

/// Login redirect target carrying the original path and query as `next`.
fn login_redirect(config: &Config, req: &HttpRequest) -> String {
    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    format!(
        "{}?next={}",
        config.auth.login_path,
        urlencoding::encode(next)
    )
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match authenticated_user(req) {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => {
                let location = match req.app_data::<web::Data<Config>>() {
                    Some(config) => login_redirect(config, req),
                    None => "/auth/login/".to_string(),
                };
                Err(AppError::LoginRequired { location })
            }
        };
        ready(result)
    }
}

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(authenticated_user(req))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AppConfig, AuthConfig, CacheConfig, CorsConfig, DatabaseConfig, MediaConfig,
        PaginationConfig,
    };
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

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
                url: "postgresql://localhost/lenta".into(),
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

    #[actix_web::test]
    async fn bearer_token_authenticates() {
        let user_id = Uuid::new_v4();
        let token = auth::issue_token("test-secret", user_id, 1).expect("token");
        let req = TestRequest::default()
            .app_data(web::Data::new(test_config()))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let user = CurrentUser::from_request(&req, &mut Payload::None)
            .await
            .expect("extracts");
        assert_eq!(user.0, user_id);
    }

    #[actix_web::test]
    async fn session_cookie_authenticates() {
        let user_id = Uuid::new_v4();
        let token = auth::issue_token("test-secret", user_id, 1).expect("token");
        let req = TestRequest::default()
            .app_data(web::Data::new(test_config()))
            .cookie(Cookie::new("session", token))
            .to_http_request();

        let MaybeUser(found) = MaybeUser::from_request(&req, &mut Payload::None)
            .await
            .expect("extracts");
        assert_eq!(found, Some(user_id));
    }

    #[actix_web::test]
    async fn missing_token_redirects_with_return_target() {
        let req = TestRequest::default()
            .uri("/new/?draft=1")
            .app_data(web::Data::new(test_config()))
            .to_http_request();

        let err = CurrentUser::from_request(&req, &mut Payload::None)
            .await
            .expect_err("must fail");
        match err {
            AppError::LoginRequired { location } => {
                assert_eq!(location, "/auth/login/?next=%2Fnew%2F%3Fdraft%3D1");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn invalid_token_is_anonymous() {
        let req = TestRequest::default()
            .app_data(web::Data::new(test_config()))
            .insert_header((header::AUTHORIZATION, "Bearer garbage"))
            .to_http_request();

        let MaybeUser(found) = MaybeUser::from_request(&req, &mut Payload::None)
            .await
            .expect("extracts");
        assert_eq!(found, None);
    }
}
