/// Follow/unfollow handlers.
///
/// Both operations are idempotent and both end on the target's profile,
/// whether or not a row changed. Self-follow is absorbed silently.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::handlers::{profile_url, redirect};
use crate::middleware::CurrentUser;
use crate::services::FollowService;

pub async fn profile_follow(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = user_repo::find_by_username(pool.get_ref(), &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

    let service = FollowService::new(pool.get_ref().clone());
    service.follow(user.0, &author).await?;

    Ok(redirect(&profile_url(&author.username)))
}

pub async fn profile_unfollow(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = user_repo::find_by_username(pool.get_ref(), &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

    let service = FollowService::new(pool.get_ref().clone());
    service.unfollow(user.0, &author).await?;

    Ok(redirect(&profile_url(&author.username)))
}
