/// Comment handler.
use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::handlers::{post_url, redirect};
use crate::middleware::CurrentUser;
use crate::services::CommentService;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct CommentFormData {
    pub text: Option<String>,
}

/// Attach a comment to a post. The post is resolved by id alone; the
/// username in the path only shapes the URL. Unauthenticated callers are
/// redirected to login before anything is read or written.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<(String, Uuid)>,
    form: web::Form<CommentFormData>,
) -> Result<HttpResponse> {
    let (_, post_id) = path.into_inner();
    let text = form.into_inner().text.unwrap_or_default();

    if text.trim().is_empty() {
        let mut errors = BTreeMap::new();
        errors.insert("text", vec!["This field is required.".to_string()]);
        return Ok(HttpResponse::BadRequest().json(views::comment_form(Some(text), errors)));
    }

    let service = CommentService::new(pool.get_ref().clone());
    let (post, _) = service.add_comment(post_id, user.0, &text).await?;

    Ok(redirect(&post_url(&post.author_username, post.id)))
}
