/// Account handlers: signup, login form, login.
use actix_web::{cookie::Cookie, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers::redirect;
use crate::services::AuthService;
use crate::views::UserView;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Return target from the login redirect; must be a local path.
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    if !req
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        return Err(AppError::ValidationError(
            "username may only contain letters, digits and @.+-_".to_string(),
        ));
    }

    let service = AuthService::new(pool.get_ref().clone(), &config.auth);
    let user = service
        .signup(&req.username, &req.first_name, &req.last_name, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(UserView::from(&user)))
}

/// The login form descriptor; this is where protected routes redirect.
pub async fn login_form() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "fields": [
            { "name": "username", "label": "Имя пользователя", "kind": "text" },
            { "name": "password", "label": "Пароль", "kind": "password" },
        ],
        "errors": {},
    }))
}

pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let service = AuthService::new(pool.get_ref().clone(), &config.auth);
    let (user, token) = service.login(&form.username, &form.password).await?;

    let cookie = Cookie::build("session", token.clone())
        .path("/")
        .http_only(true)
        .finish();

    // Only local paths are honored as return targets.
    if let Some(next) = form
        .next
        .filter(|n| n.starts_with('/') && !n.starts_with("//"))
    {
        let mut response = redirect(&next);
        response
            .add_cookie(&cookie)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        return Ok(response);
    }

    let mut response = HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserView::from(&user),
    });
    response
        .add_cookie(&cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}
