//! Inline downloads of one media item or one whole post.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::api::HttpClient;
use crate::download::stream::stream_to_file;
use crate::error::{Error, Result};
use crate::fs::{display_name, ensure_dir, make_unique_filename};
use crate::media::MediaKind;
use crate::social::{is_instagram_url, SocialMediaResolver};

/// Caption reported for posts without one.
pub const NO_CAPTION: &str = "No caption";

/// Timestamped name for a single fetched item.
pub fn single_file_name(kind: MediaKind, now: chrono::DateTime<chrono::Local>) -> String {
    format!(
        "instagram_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        kind.extension()
    )
}

/// Name of the `index`-th (1-based) item of a post.
pub fn post_file_name(shortcode: &str, index: usize, kind: MediaKind) -> String {
    format!("{}_{}.{}", shortcode, index, kind.extension())
}

/// Fetch one media URL into `folder`.
pub async fn download_single_media(
    http: &HttpClient,
    url: &str,
    kind: MediaKind,
    folder: &Path,
) -> Result<PathBuf> {
    if url.trim().is_empty() {
        return Err(Error::InvalidInput("Media URL is required".to_string()));
    }

    ensure_dir(folder).await?;
    let path = make_unique_filename(&folder.join(single_file_name(kind, chrono::Local::now())));
    let bytes = stream_to_file(http, url, &path).await?;
    tracing::info!("Saved {} ({} bytes)", path.display(), bytes);

    Ok(path)
}

/// Result of a whole-post download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDownload {
    pub files: Vec<String>,
    pub caption: String,
}

impl PostDownload {
    pub fn message(&self) -> String {
        format!("Downloaded {} file(s) successfully!", self.files.len())
    }
}

/// Resolve a post and fetch all of its items into `folder`.
pub async fn download_post(
    resolver: &SocialMediaResolver,
    http: &HttpClient,
    url: &str,
    folder: &Path,
) -> Result<PostDownload> {
    if url.trim().is_empty() {
        return Err(Error::InvalidInput("URL is required".to_string()));
    }
    if !is_instagram_url(url) {
        return Err(Error::InvalidInput(
            "Please provide a valid Instagram URL".to_string(),
        ));
    }

    let resolved = resolver.resolve_url(url).await?;
    ensure_dir(folder).await?;

    let mut files = Vec::with_capacity(resolved.media_items.len());
    for (i, item) in resolved.media_items.iter().enumerate() {
        let path = folder.join(post_file_name(&item.shortcode, i + 1, item.kind));
        stream_to_file(http, &item.source_url, &path).await?;
        files.push(display_name(&path));
    }

    Ok(PostDownload {
        files,
        caption: resolved
            .caption
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| NO_CAPTION.to_string()),
    })
}
