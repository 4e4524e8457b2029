//! Instagram media-info backend for [`PostSource`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::api::client::HttpClient;
use crate::api::types::{MediaInfoItem, MediaInfoResponse};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::social::{shortcode_to_media_id, Post, PostBody, PostNode, PostSource};

/// Base URL of the private media API.
const API_BASE_URL: &str = "https://i.instagram.com/api/v1";

/// Fetches post metadata from Instagram's media-info endpoint.
#[derive(Clone)]
pub struct InstagramClient {
    http: HttpClient,
    app_id: String,
    base_url: String,
}

impl InstagramClient {
    pub fn new(http: HttpClient, app_id: impl Into<String>) -> Self {
        Self {
            http,
            app_id: app_id.into(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    pub fn from_config(http: HttpClient, config: &Config) -> Self {
        Self::new(http, config.instagram.app_id.clone())
    }

    /// Point the client at another API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn info_url(&self, media_id: &str) -> String {
        format!("{}/media/{}/info/", self.base_url, media_id)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let app_id = HeaderValue::from_str(&self.app_id)
            .map_err(|e| Error::Config(format!("Invalid Instagram app id: {}", e)))?;
        headers.insert("X-IG-App-ID", app_id);
        Ok(headers)
    }
}

#[async_trait]
impl PostSource for InstagramClient {
    async fn fetch_post(&self, shortcode: &str) -> Result<Post> {
        let media_id = shortcode_to_media_id(shortcode).ok_or_else(|| {
            Error::Resolve(format!("Unable to decode shortcode {}", shortcode))
        })?;

        tracing::info!("Fetching post {} (media id {})", shortcode, media_id);
        let response: MediaInfoResponse = self
            .http
            .get_json(&self.info_url(&media_id), self.headers()?)
            .await?;

        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::Resolve(format!("Post {} not found", shortcode)))?;

        Ok(post_from_item(shortcode, &item))
    }
}

fn post_node(item: &MediaInfoItem) -> PostNode {
    PostNode {
        is_video: item.is_video(),
        display_url: item.best_image_url().unwrap_or_default(),
        video_url: item.best_video_url(),
    }
}

fn post_from_item(shortcode: &str, item: &MediaInfoItem) -> Post {
    let body = if item.is_carousel() {
        PostBody::Carousel(item.carousel_media.iter().map(post_node).collect())
    } else {
        PostBody::Single(post_node(item))
    };

    Post {
        shortcode: shortcode.to_string(),
        caption: item.caption_text(),
        body,
    }
}
