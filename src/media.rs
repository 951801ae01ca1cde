/// Media storage
///
/// Uploaded post images live on the local filesystem under
/// `<root>/posts/` and are referenced everywhere else by relative path
/// (`posts/<filename>`). Serving the files back is left to the static
/// tier in front of this service.
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const POSTS_PREFIX: &str = "posts";

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage directories if they are missing.
    pub async fn ensure_layout(&self) -> Result<()> {
        fs::create_dir_all(self.root.join(POSTS_PREFIX)).await?;
        Ok(())
    }

    /// Store an uploaded post image and return its relative path.
    ///
    /// The client-supplied filename is sanitized; a name that is already
    /// taken gets a short unique suffix instead of overwriting.
    pub async fn store_post_image(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let name = sanitize_filename(filename);
        let dir = self.root.join(POSTS_PREFIX);
        fs::create_dir_all(&dir).await?;

        let final_name = if path_exists(&dir.join(&name)).await {
            with_unique_suffix(&name)
        } else {
            name
        };

        fs::write(dir.join(&final_name), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to store image: {}", e)))?;

        Ok(format!("{}/{}", POSTS_PREFIX, final_name))
    }
}

async fn path_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Keep only the final path component, then only filename-safe characters.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

fn with_unique_suffix(name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let suffix = &suffix[..8];
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, suffix, ext),
        _ => format!("{}-{}", name, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("small.gif"), "small.gif");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a b?.png"), "ab.png");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[tokio::test]
    async fn stores_image_under_posts_prefix() {
        let dir = tempdir().expect("tempdir");
        let storage = MediaStorage::new(dir.path());
        storage.ensure_layout().await.expect("layout");

        let path = storage
            .store_post_image("small.gif", b"GIF89a")
            .await
            .expect("store");
        assert_eq!(path, "posts/small.gif");
        assert!(dir.path().join("posts/small.gif").exists());
    }

    #[tokio::test]
    async fn colliding_names_get_a_unique_suffix() {
        let dir = tempdir().expect("tempdir");
        let storage = MediaStorage::new(dir.path());

        let first = storage
            .store_post_image("small.gif", b"GIF89a")
            .await
            .expect("store");
        let second = storage
            .store_post_image("small.gif", b"GIF89a")
            .await
            .expect("store");

        assert_eq!(first, "posts/small.gif");
        assert_ne!(first, second);
        assert!(second.starts_with("posts/small-"));
        assert!(second.ends_with(".gif"));
    }
}
