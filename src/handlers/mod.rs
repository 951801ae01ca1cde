/// HTTP handlers for lenta
///
/// One module per operation family. Handlers translate requests into
/// service calls and map results onto view models; mutations answer with
/// redirects the way a browser-facing app expects.
pub mod about;
pub mod auth;
pub mod comments;
pub mod feed;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod profiles;

pub use about::{about_author, about_tech};
pub use auth::{login, login_form, signup};
pub use comments::add_comment;
pub use feed::{follow_index, index};
pub use follows::{profile_follow, profile_unfollow};
pub use groups::group_posts;
pub use posts::{create_post, edit_post_form, new_post_form, post_view, update_post};
pub use profiles::profile;

use actix_web::{http::header, HttpResponse};
use serde::Deserialize;

/// `?page=` is kept raw so malformed values can degrade to page 1
/// instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct PageParam {
    pub page: Option<String>,
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn post_url(username: &str, post_id: uuid::Uuid) -> String {
    format!("/{}/{}/", username, post_id)
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/{}/", username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location_and_found_status() {
        let response = redirect("/admin2/");
        assert_eq!(response.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin2/");
    }

    #[test]
    fn url_helpers_match_route_shapes() {
        let id = uuid::Uuid::nil();
        assert_eq!(profile_url("admin2"), "/admin2/");
        assert_eq!(
            post_url("admin2", id),
            format!("/admin2/{}/", id)
        );
    }
}
