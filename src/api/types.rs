//! Instagram media-info response types.

use serde::Deserialize;

/// `media_type` of a multi-item post.
pub const MEDIA_TYPE_CAROUSEL: i64 = 8;
/// `media_type` of a video.
pub const MEDIA_TYPE_VIDEO: i64 = 2;

/// Response of `/api/v1/media/{id}/info/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfoResponse {
    #[serde(default)]
    pub items: Vec<MediaInfoItem>,
}

/// A post, or one node of a carousel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfoItem {
    #[serde(default)]
    pub media_type: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<MediaCandidate>,
    #[serde(default)]
    pub carousel_media: Vec<MediaInfoItem>,
    #[serde(default)]
    pub caption: Option<Caption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageVersions {
    #[serde(default)]
    pub candidates: Vec<MediaCandidate>,
}

/// One rendition of an image or video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaCandidate {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Caption {
    #[serde(default)]
    pub text: Option<String>,
}

impl MediaCandidate {
    fn area(&self) -> i64 {
        let width = self.width.unwrap_or(0).max(0);
        let height = self.height.unwrap_or(0).max(0);
        width.saturating_mul(height)
    }
}

/// URL of the largest candidate; the first one wins ties.
pub fn best_candidate_url(candidates: &[MediaCandidate]) -> Option<String> {
    let mut best: Option<&MediaCandidate> = None;
    for candidate in candidates.iter().filter(|c| !c.url.trim().is_empty()) {
        if best.map_or(true, |b| candidate.area() > b.area()) {
            best = Some(candidate);
        }
    }
    best.map(|c| c.url.trim().to_string())
}

impl MediaInfoItem {
    pub fn is_carousel(&self) -> bool {
        self.media_type == Some(MEDIA_TYPE_CAROUSEL)
    }

    pub fn is_video(&self) -> bool {
        self.media_type == Some(MEDIA_TYPE_VIDEO)
    }

    pub fn best_image_url(&self) -> Option<String> {
        self.image_versions2
            .as_ref()
            .and_then(|v| best_candidate_url(&v.candidates))
    }

    pub fn best_video_url(&self) -> Option<String> {
        best_candidate_url(&self.video_versions)
    }

    pub fn caption_text(&self) -> Option<String> {
        self.caption
            .as_ref()
            .and_then(|c| c.text.clone())
            .filter(|t| !t.is_empty())
    }
}
