/// Post handlers: single-post view, new-post form, edit form.
///
/// Submission is `multipart/form-data` (text, group choice, image file).
/// Validation failures re-render the form descriptor with per-field
/// errors and persist nothing; successes answer with a redirect.
use std::collections::BTreeMap;

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::group_repo;
use crate::error::{AppError, Result};
use crate::handlers::{post_url, redirect};
use crate::media::MediaStorage;
use crate::middleware::CurrentUser;
use crate::services::PostService;
use crate::views::{self, CommentView, PostPageView, PostView};

/// Uploads larger than this are rejected with a field error.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const REQUIRED_MSG: &str = "This field is required.";
const INVALID_CHOICE_MSG: &str = "Select a valid choice.";
const INVALID_IMAGE_MSG: &str = "Upload a valid image.";

#[derive(MultipartForm)]
pub struct PostForm {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    pub image: Option<TempFile>,
}

type FieldErrors = BTreeMap<&'static str, Vec<String>>;

struct UploadedImage {
    filename: String,
    bytes: Vec<u8>,
}

struct PostInput {
    text: String,
    group_value: String,
    group_id: Option<Uuid>,
    image: Option<UploadedImage>,
    errors: FieldErrors,
}

/// Single post view: the post, its comments oldest-first, the author's
/// post list, and an empty comment form.
pub async fn post_view(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let service = PostService::new(pool.get_ref().clone());
    let data = service.post_page(&username, post_id).await?;

    Ok(HttpResponse::Ok().json(PostPageView {
        post: PostView::from(&data.post),
        comments: data.comments.iter().map(CommentView::from).collect(),
        author_posts: data.author_posts.iter().map(PostView::from).collect(),
        form: views::comment_form(None, BTreeMap::new()),
    }))
}

/// Empty submission form with the current group choices.
pub async fn new_post_form(pool: web::Data<PgPool>, _user: CurrentUser) -> Result<HttpResponse> {
    let groups = group_repo::list_groups(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(views::post_form(&groups, None, None, BTreeMap::new())))
}

pub async fn create_post(
    pool: web::Data<PgPool>,
    media: web::Data<MediaStorage>,
    user: CurrentUser,
    MultipartForm(form): MultipartForm<PostForm>,
) -> Result<HttpResponse> {
    let input = resolve_input(pool.get_ref(), form).await?;
    if !input.errors.is_empty() {
        return render_form_errors(pool.get_ref(), input).await;
    }

    let image_path = store_image(&media, input.image.as_ref()).await?;

    let service = PostService::new(pool.get_ref().clone());
    service
        .create(user.0, &input.text, input.group_id, image_path.as_deref())
        .await?;

    Ok(redirect("/"))
}

/// Edit form prefilled from the existing post. A caller who is not the
/// author is bounced to the post view without an error.
pub async fn edit_post_form(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let service = PostService::new(pool.get_ref().clone());
    let (_, post) = service.resolve(&username, post_id).await?;

    if post.author_id != user.0 {
        return Ok(redirect(&post_url(&username, post_id)));
    }

    let groups = group_repo::list_groups(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(views::post_form(
        &groups,
        Some(post.text.clone()),
        post.group_id.map(|id| id.to_string()),
        BTreeMap::new(),
    )))
}

pub async fn update_post(
    pool: web::Data<PgPool>,
    media: web::Data<MediaStorage>,
    user: CurrentUser,
    path: web::Path<(String, Uuid)>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let service = PostService::new(pool.get_ref().clone());
    let (_, post) = service.resolve(&username, post_id).await?;

    if post.author_id != user.0 {
        return Ok(redirect(&post_url(&username, post_id)));
    }

    let input = resolve_input(pool.get_ref(), form).await?;
    if !input.errors.is_empty() {
        return render_form_errors(pool.get_ref(), input).await;
    }

    // A fresh upload replaces the image; otherwise the old one stays.
    let image_path = match store_image(&media, input.image.as_ref()).await? {
        Some(path) => Some(path),
        None => post.image.clone(),
    };

    service
        .update(post.id, &input.text, input.group_id, image_path.as_deref())
        .await?;

    Ok(redirect(&post_url(&username, post_id)))
}

async fn render_form_errors(pool: &PgPool, input: PostInput) -> Result<HttpResponse> {
    let groups = group_repo::list_groups(pool).await?;
    let group_value = (!input.group_value.is_empty()).then_some(input.group_value);
    Ok(HttpResponse::BadRequest().json(views::post_form(
        &groups,
        Some(input.text),
        group_value,
        input.errors,
    )))
}

async fn store_image(
    media: &MediaStorage,
    image: Option<&UploadedImage>,
) -> Result<Option<String>> {
    match image {
        Some(upload) => Ok(Some(
            media
                .store_post_image(&upload.filename, &upload.bytes)
                .await?,
        )),
        None => Ok(None),
    }
}

async fn resolve_input(pool: &PgPool, form: PostForm) -> Result<PostInput> {
    let mut errors = FieldErrors::new();

    let text = form.text.map(|t| t.0).unwrap_or_default();
    if text.trim().is_empty() {
        errors.entry("text").or_default().push(REQUIRED_MSG.into());
    }

    let group_value = form
        .group
        .map(|g| g.0.trim().to_string())
        .unwrap_or_default();
    let group_id = if group_value.is_empty() {
        None
    } else {
        match Uuid::parse_str(&group_value) {
            Ok(id) => {
                let found = group_repo::find_by_id(pool, id).await?;
                if found.is_none() {
                    errors
                        .entry("group")
                        .or_default()
                        .push(INVALID_CHOICE_MSG.into());
                }
                found.map(|g| g.id)
            }
            Err(_) => {
                errors
                    .entry("group")
                    .or_default()
                    .push(INVALID_CHOICE_MSG.into());
                None
            }
        }
    };

    let image = match form.image {
        Some(file) => read_image(file, &mut errors)?,
        None => None,
    };

    Ok(PostInput {
        text,
        group_value,
        group_id,
        image,
        errors,
    })
}

fn read_image(file: TempFile, errors: &mut FieldErrors) -> Result<Option<UploadedImage>> {
    let filename = file.file_name.clone().unwrap_or_default();

    // Browsers submit an empty file part when no file was chosen.
    if file.size == 0 && filename.is_empty() {
        return Ok(None);
    }

    if file.size > MAX_IMAGE_BYTES {
        errors
            .entry("image")
            .or_default()
            .push(format!("Image exceeds {} bytes.", MAX_IMAGE_BYTES));
        return Ok(None);
    }

    if !looks_like_image(&file, &filename) {
        errors
            .entry("image")
            .or_default()
            .push(INVALID_IMAGE_MSG.into());
        return Ok(None);
    }

    let bytes = std::fs::read(file.file.path())
        .map_err(|e| AppError::Internal(format!("failed to read upload: {}", e)))?;

    Ok(Some(UploadedImage {
        filename: if filename.is_empty() {
            "upload".to_string()
        } else {
            filename
        },
        bytes,
    }))
}

/// Accept a declared image content type, or fall back to the extension
/// for clients that upload as application/octet-stream.
fn looks_like_image(file: &TempFile, filename: &str) -> bool {
    if file
        .content_type
        .as_ref()
        .map(|ct| ct.type_() == mime::IMAGE)
        .unwrap_or(false)
    {
        return true;
    }

    let ext = filename.rsplit('.').next().map(|ext| ext.to_lowercase());
    matches!(
        ext.as_deref(),
        Some("jpg") | Some("jpeg") | Some("png") | Some("gif") | Some("webp")
    )
}
