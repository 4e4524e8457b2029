//! Extraction service contract.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{DownloadMode, Quality};
use crate::error::Result;

/// Metadata the extraction service reports for a URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractedInfo {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub artist: Option<String>,
    pub creator: Option<String>,
    pub album: Option<String>,
    pub playlist_title: Option<String>,
    /// `YYYYMMDD`.
    pub upload_date: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: Option<String>,
    pub extractor_key: Option<String>,
}

/// Result of a completed download.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub info: ExtractedInfo,
    /// File the service reports as its output.
    pub filename: PathBuf,
}

/// Per-job download options.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub mode: DownloadMode,
    pub quality: Quality,
    pub output_dir: PathBuf,
    /// Sanitized stem to name the output with; the service's own title
    /// template is used when absent.
    pub file_stem: Option<String>,
}

impl ExtractOptions {
    /// Output template in yt-dlp syntax.
    pub fn output_template(&self) -> PathBuf {
        let stem = self.file_stem.as_deref().unwrap_or("%(title)s");
        self.output_dir.join(format!("{}.%(ext)s", stem))
    }
}

/// Raw download state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Downloading,
    Finished,
    Error,
}

/// Progress notification emitted while a download runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    pub downloaded_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
    pub total_bytes_estimate: Option<u64>,
}

impl ProgressEvent {
    /// A `downloading` event with byte counters.
    pub fn downloading(downloaded: u64, total: u64) -> Self {
        Self {
            status: ProgressStatus::Downloading,
            downloaded_bytes: Some(downloaded),
            total_bytes: Some(total),
            total_bytes_estimate: None,
        }
    }

    pub fn finished() -> Self {
        Self {
            status: ProgressStatus::Finished,
            downloaded_bytes: None,
            total_bytes: None,
            total_bytes_estimate: None,
        }
    }

    pub fn error() -> Self {
        Self {
            status: ProgressStatus::Error,
            downloaded_bytes: None,
            total_bytes: None,
            total_bytes_estimate: None,
        }
    }
}

/// Receiver of progress events.
///
/// Returning an error asks the service to abort the running download and
/// return that error.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent) -> Result<()>;
}

/// Extraction service: metadata lookup and download.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the backend (for logging).
    fn name(&self) -> &'static str;

    /// Fetch metadata without downloading.
    async fn probe(&self, url: &str) -> Result<ExtractedInfo>;

    /// Download `url` according to `options`, reporting progress to `sink`.
    async fn download(
        &self,
        url: &str,
        options: &ExtractOptions,
        sink: &dyn ProgressSink,
    ) -> Result<Extraction>;

    /// Save the URL's thumbnail as `<title>.jpg` in `output_dir` without
    /// downloading the media itself.
    async fn download_thumbnail(&self, url: &str, output_dir: &Path) -> Result<()>;
}
