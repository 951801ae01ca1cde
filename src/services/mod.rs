/// Business logic layer for lenta
///
/// High-level operations over the repositories:
/// - Feed service: feed assembly and pagination
/// - Post service: post creation, edits, single-post pages
/// - Comment service: comment creation
/// - Follow service: the follow/unfollow rules
/// - Auth service: accounts and session tokens
pub mod auth;
pub mod comments;
pub mod feeds;
pub mod follows;
pub mod posts;

pub use auth::AuthService;
pub use comments::CommentService;
pub use feeds::{FeedService, ProfileData};
pub use follows::FollowService;
pub use posts::PostService;
