/// View models
///
/// Pure mapping from domain rows to the JSON shapes the endpoints return.
/// Nothing in here touches storage, so the data-model operations stay
/// unit-testable without a rendering dependency.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{CommentDetail, Group, PostDetail, User};
use crate::pagination::Page;

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<&Page> for PageMeta {
    fn from(page: &Page) -> Self {
        Self {
            number: page.number,
            num_pages: page.num_pages,
            total: page.total,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupRef {
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: String,
    pub group: Option<GroupRef>,
    pub image: Option<String>,
}

impl From<&PostDetail> for PostView {
    fn from(post: &PostDetail) -> Self {
        Self {
            id: post.id,
            text: post.text.clone(),
            pub_date: post.pub_date,
            author: post.author_username.clone(),
            group: match (&post.group_title, &post.group_slug) {
                (Some(title), Some(slug)) => Some(GroupRef {
                    title: title.clone(),
                    slug: slug.clone(),
                }),
                _ => None,
            },
            image: post.image.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author: String,
}

impl From<&CommentDetail> for CommentView {
    fn from(comment: &CommentDetail) -> Self {
        Self {
            id: comment.id,
            text: comment.text.clone(),
            created: comment.created,
            author: comment.author_username.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<&Group> for GroupView {
    fn from(group: &Group) -> Self {
        Self {
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedView {
    pub posts: Vec<PostView>,
    pub page: PageMeta,
}

pub fn feed_view(posts: &[PostDetail], page: &Page) -> FeedView {
    FeedView {
        posts: posts.iter().map(PostView::from).collect(),
        page: PageMeta::from(page),
    }
}

#[derive(Debug, Serialize)]
pub struct GroupFeedView {
    pub group: GroupView,
    pub posts: Vec<PostView>,
    pub page: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub author: UserView,
    pub following: bool,
    pub follows: Vec<UserView>,
    pub followers: Vec<UserView>,
    pub posts: Vec<PostView>,
    pub page: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PostPageView {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub author_posts: Vec<PostView>,
    pub form: FormView,
}

// ---------------------------------------------------------------------
// Form descriptors
// ---------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

/// A renderable form: its fields plus per-field error messages.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub fields: Vec<FormField>,
    pub errors: BTreeMap<&'static str, Vec<String>>,
}

impl FormView {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Submission form for posts: text, group choice, image.
pub fn post_form(
    groups: &[Group],
    text: Option<String>,
    group: Option<String>,
    errors: BTreeMap<&'static str, Vec<String>>,
) -> FormView {
    let choices = groups
        .iter()
        .map(|g| Choice {
            value: g.id.to_string(),
            label: g.title.clone(),
        })
        .collect();

    FormView {
        fields: vec![
            FormField {
                name: "text",
                label: "Текст",
                kind: "textarea",
                value: text,
                choices: None,
            },
            FormField {
                name: "group",
                label: "Группа",
                kind: "choice",
                value: group,
                choices: Some(choices),
            },
            FormField {
                name: "image",
                label: "Изображение",
                kind: "file",
                value: None,
                choices: None,
            },
        ],
        errors,
    }
}

/// Submission form for comments: a single text field.
pub fn comment_form(text: Option<String>, errors: BTreeMap<&'static str, Vec<String>>) -> FormView {
    FormView {
        fields: vec![FormField {
            name: "text",
            label: "Текст",
            kind: "textarea",
            value: text,
            choices: None,
        }],
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(group: bool) -> PostDetail {
        PostDetail {
            id: Uuid::new_v4(),
            text: "Тестовый текст".into(),
            pub_date: Utc::now(),
            author_id: Uuid::new_v4(),
            author_username: "admin2".into(),
            group_id: group.then(Uuid::new_v4),
            group_title: group.then(|| "Тестовый заголовок".to_string()),
            group_slug: group.then(|| "test_group".to_string()),
            image: Some("posts/small.gif".into()),
        }
    }

    #[test]
    fn post_view_carries_author_group_and_image() {
        let view = PostView::from(&sample_post(true));
        assert_eq!(view.author, "admin2");
        assert_eq!(view.image.as_deref(), Some("posts/small.gif"));
        assert_eq!(view.group.as_ref().unwrap().slug, "test_group");
    }

    #[test]
    fn ungrouped_post_renders_without_group() {
        let view = PostView::from(&sample_post(false));
        assert!(view.group.is_none());
    }

    #[test]
    fn empty_comment_form_has_no_errors() {
        let form = comment_form(None, BTreeMap::new());
        assert!(!form.has_errors());
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].name, "text");
    }

    #[test]
    fn page_meta_mirrors_the_page() {
        let page = crate::pagination::Paginator::new(13, 10).page(1);
        let meta = PageMeta::from(&page);
        assert_eq!(meta.number, 1);
        assert_eq!(meta.num_pages, 2);
        assert!(meta.has_next);
        assert!(!meta.has_previous);
    }
}
