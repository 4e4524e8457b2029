//! Post resolution into ordered media items.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::media::{MediaItem, MediaKind};
use crate::social::shortcode::extract_shortcode;

/// One media node of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostNode {
    pub is_video: bool,
    pub display_url: String,
    pub video_url: Option<String>,
}

/// Layout of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBody {
    Single(PostNode),
    /// Multi-item post, nodes in their original order.
    Carousel(Vec<PostNode>),
}

/// A fetched post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub shortcode: String,
    pub caption: Option<String>,
    pub body: PostBody,
}

/// Source of post metadata.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_post(&self, shortcode: &str) -> Result<Post>;
}

/// Items of a resolved post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPost {
    #[serde(rename = "media")]
    pub media_items: Vec<MediaItem>,
    pub caption: Option<String>,
}

/// Listing response: `{success, media}` or `{success, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaListing {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<MediaItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Result<ResolvedPost>> for MediaListing {
    fn from(result: Result<ResolvedPost>) -> Self {
        match result {
            Ok(post) => Self {
                success: true,
                media: Some(post.media_items),
                caption: post.caption,
                message: None,
            },
            Err(e) => Self {
                success: false,
                media: None,
                caption: None,
                message: Some(e.to_string()),
            },
        }
    }
}

/// Turns post URLs and shortcodes into downloadable items.
#[derive(Clone)]
pub struct SocialMediaResolver {
    source: Arc<dyn PostSource>,
}

impl SocialMediaResolver {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self { source }
    }

    /// Resolve a post URL.
    pub async fn resolve_url(&self, url: &str) -> Result<ResolvedPost> {
        let shortcode = extract_shortcode(url)
            .ok_or_else(|| Error::InvalidInput("Invalid Instagram URL".to_string()))?;
        self.resolve_post(&shortcode).await
    }

    /// Resolve a post by shortcode.
    pub async fn resolve_post(&self, shortcode: &str) -> Result<ResolvedPost> {
        let post = self.source.fetch_post(shortcode).await?;

        let nodes = match &post.body {
            PostBody::Single(node) => std::slice::from_ref(node),
            PostBody::Carousel(nodes) => nodes.as_slice(),
        };

        let media_items = nodes
            .iter()
            .filter_map(|node| media_item(node, shortcode))
            .collect::<Vec<_>>();

        tracing::debug!("Post {} resolved to {} item(s)", shortcode, media_items.len());

        Ok(ResolvedPost {
            media_items,
            caption: post.caption,
        })
    }
}

fn media_item(node: &PostNode, shortcode: &str) -> Option<MediaItem> {
    let (kind, source_url) = if node.is_video {
        match &node.video_url {
            Some(url) => (MediaKind::Video, url.clone()),
            None => {
                tracing::warn!("Skipping video in {} without a media URL", shortcode);
                return None;
            }
        }
    } else {
        (MediaKind::Image, node.display_url.clone())
    };

    Some(MediaItem {
        kind,
        source_url,
        thumbnail_url: node.display_url.clone(),
        shortcode: shortcode.to_string(),
    })
}
