//! Single-job controller: admission, worker lifecycle, pause and status.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::api::{HttpClient, InstagramClient};
use crate::config::{secure_path, validate_url, Config, DownloadMode, Quality};
use crate::download::bulk::download_batch;
use crate::download::progress::ProgressReporter;
use crate::download::single::{self, PostDownload};
use crate::download::state::{JobId, JobOutcome, JobPhase, JobStore, StatusSnapshot};
use crate::error::{Error, Result};
use crate::extract::{ExtractOptions, Extractor, YtDlp};
use crate::fs::{ensure_dir, sanitize_title};
use crate::media::{locate_audio_file, MediaKind, MediaPostProcessor};
use crate::social::{MediaListing, SocialMediaResolver};

/// Platform name that skips URL verification.
const PLATFORM_OTHER: &str = "other";

/// A download request.
#[derive(Debug, Clone, Default)]
pub struct JobRequest {
    pub url: String,
    pub quality: Quality,
    pub mode: DownloadMode,
    /// Destination relative to the download root; empty means the root.
    pub folder: Option<String>,
    pub platform: Option<String>,
}

/// Answer to a submit call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

impl Admission {
    fn accepted(job_id: JobId, message: Option<&str>) -> Self {
        Self {
            success: true,
            message: message.map(str::to_string),
            job_id: Some(job_id),
        }
    }

    fn rejected(err: &Error) -> Self {
        Self {
            success: false,
            message: Some(err.to_string()),
            job_id: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.success
    }
}

/// Answer to a title lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleInfo {
    pub success: bool,
    pub title: String,
    pub thumbnail: Option<String>,
}

impl TitleInfo {
    fn failed(title: impl Into<String>) -> Self {
        Self {
            success: false,
            title: title.into(),
            thumbnail: None,
        }
    }
}

/// Answer to a pause toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PauseToggle {
    pub success: bool,
    pub is_paused: bool,
    pub message: String,
}

impl From<bool> for PauseToggle {
    fn from(is_paused: bool) -> Self {
        let message = if is_paused {
            "Download paused"
        } else {
            "Download resumed"
        };
        Self {
            success: true,
            is_paused,
            message: message.to_string(),
        }
    }
}

/// Owns the job store and runs at most one background job at a time.
pub struct JobController {
    root: PathBuf,
    store: Arc<JobStore>,
    extractor: Arc<dyn Extractor>,
    post: MediaPostProcessor,
    http: HttpClient,
    resolver: SocialMediaResolver,
    task: Mutex<Option<(JobId, JoinHandle<JobOutcome>)>>,
}

impl JobController {
    pub fn new(
        root: impl Into<PathBuf>,
        extractor: Arc<dyn Extractor>,
        post: MediaPostProcessor,
        http: HttpClient,
        resolver: SocialMediaResolver,
    ) -> Self {
        Self {
            root: root.into(),
            store: Arc::new(JobStore::new()),
            extractor,
            post,
            http,
            resolver,
            task: Mutex::new(None),
        }
    }

    /// Wire up the yt-dlp and Instagram backends from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::from_config(config)?;
        let post = MediaPostProcessor::from_config(http.clone(), config);
        let instagram = InstagramClient::from_config(http.clone(), config);

        Ok(Self::new(
            config.download_directory(),
            Arc::new(YtDlp::from_config(config)),
            post,
            http,
            SocialMediaResolver::new(Arc::new(instagram)),
        ))
    }

    /// Validate and start a download job. Returns without waiting for it.
    pub async fn submit(&self, request: JobRequest) -> Admission {
        match self.try_submit(request).await {
            Ok(id) => Admission::accepted(id, None),
            Err(e) => {
                tracing::warn!("Download rejected: {}", e);
                Admission::rejected(&e)
            }
        }
    }

    async fn try_submit(&self, request: JobRequest) -> Result<JobId> {
        let url = request.url.trim().to_string();
        validate_url(&url)?;
        let folder = secure_path(&self.root, request.folder.as_deref())?;

        if self.store.is_active() {
            return Err(Error::JobActive);
        }

        if let Some(platform) = request
            .platform
            .as_deref()
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case(PLATFORM_OTHER))
        {
            self.verify_platform(&url, platform).await;
        }

        let (id, guard) = self.store.try_begin()?;
        tracing::info!("Starting job {} for {} ({}, {})", id, url, request.mode, request.quality);

        let worker = Worker {
            store: Arc::clone(&self.store),
            extractor: Arc::clone(&self.extractor),
            post: self.post.clone(),
            options: ExtractOptions {
                mode: request.mode,
                quality: request.quality,
                output_dir: folder,
                file_stem: self.store.title().as_deref().and_then(sanitize_title),
            },
            url,
        };

        let store = Arc::clone(&self.store);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let outcome = JobOutcome::from_result(worker.run().await);
            store.record_outcome(&outcome);
            tracing::info!("Job {} finished: {:?}", id, outcome);
            outcome
        });

        *self.task.lock().await = Some((id, handle));
        Ok(id)
    }

    /// Start a background batch download of direct media URLs.
    pub async fn submit_bulk(&self, urls: Vec<String>, folder: Option<&str>) -> Admission {
        match self.try_submit_bulk(urls, folder).await {
            Ok(id) => Admission::accepted(id, Some("Download started")),
            Err(e) => {
                tracing::warn!("Batch rejected: {}", e);
                Admission::rejected(&e)
            }
        }
    }

    async fn try_submit_bulk(&self, urls: Vec<String>, folder: Option<&str>) -> Result<JobId> {
        let urls: Vec<String> = urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if urls.is_empty() {
            return Err(Error::InvalidInput("No files selected".to_string()));
        }

        let folder = secure_path(&self.root, folder)?;
        let (id, guard) = self.store.try_begin()?;
        tracing::info!("Starting batch job {} with {} file(s)", id, urls.len());

        let store = Arc::clone(&self.store);
        let http = self.http.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            store.set_phase(JobPhase::Downloading);
            match download_batch(&store, &http, &urls, &folder).await {
                Ok(count) => {
                    store.report(100.0, format!("Downloaded {} files successfully.", count));
                    store.set_phase(JobPhase::Done);
                    JobOutcome::Succeeded { file: None }
                }
                Err(e) => {
                    let outcome = JobOutcome::from_result(Err(e));
                    store.record_outcome(&outcome);
                    outcome
                }
            }
        });

        *self.task.lock().await = Some((id, handle));
        Ok(id)
    }

    /// Flip the pause flag and return its new value.
    ///
    /// Pausing aborts the running attempt at its next progress report; the
    /// job ends with "Download paused" and is resumed by submitting again.
    pub fn toggle_pause(&self) -> bool {
        let paused = self.store.toggle_paused();
        tracing::info!("Pause toggled: {}", paused);
        paused
    }

    pub fn status(&self) -> StatusSnapshot {
        self.store.snapshot()
    }

    /// Wait for the most recently started job to end.
    ///
    /// Returns `None` when there is no job to wait for or it was already
    /// awaited.
    pub async fn wait(&self) -> Option<JobOutcome> {
        let (id, handle) = self.task.lock().await.take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!("Job {} task failed: {}", id, e);
                None
            }
        }
    }

    /// Look up a URL's title and remember it for naming the next download.
    pub async fn fetch_title(&self, url: &str) -> TitleInfo {
        let url = url.trim();
        if url.is_empty() {
            return TitleInfo::failed("Please enter a video URL");
        }

        match self.extractor.probe(url).await {
            Ok(info) => {
                let title = info
                    .title
                    .clone()
                    .unwrap_or_else(|| "No title found".to_string());
                self.store.set_title(Some(title.clone()));
                TitleInfo {
                    success: true,
                    title,
                    thumbnail: info.thumbnail_url,
                }
            }
            Err(e) => TitleInfo::failed(format!("Error fetching title: {}", e.headline())),
        }
    }

    /// Resolve a post URL into its media items.
    pub async fn media_info(&self, url: &str) -> MediaListing {
        if url.trim().is_empty() {
            return MediaListing::from(Err(Error::InvalidInput("URL is required".to_string())));
        }
        MediaListing::from(self.resolver.resolve_url(url).await)
    }

    /// Fetch one direct media URL, blocking the caller until done.
    pub async fn download_single(
        &self,
        url: &str,
        kind: MediaKind,
        folder: Option<&str>,
    ) -> Result<PathBuf> {
        let folder = secure_path(&self.root, folder)?;
        single::download_single_media(&self.http, url, kind, &folder).await
    }

    /// Fetch every item of a post, blocking the caller until done.
    pub async fn download_post(&self, url: &str, folder: Option<&str>) -> Result<PostDownload> {
        let folder = secure_path(&self.root, folder)?;
        single::download_post(&self.resolver, &self.http, url, &folder).await
    }

    /// Save a URL's thumbnail as `<title>.jpg` and return the folder it went to.
    pub async fn download_thumbnail(&self, url: &str, folder: Option<&str>) -> Result<PathBuf> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidInput("URL is required".to_string()));
        }
        let folder = secure_path(&self.root, folder)?;
        ensure_dir(&folder).await?;

        self.extractor
            .download_thumbnail(url, &folder)
            .await
            .map_err(|e| {
                Error::Extraction(format!("Error downloading thumbnail: {}", e.headline()))
            })?;
        tracing::info!("Thumbnail for {} saved to {}", url, folder.display());
        Ok(folder)
    }

    async fn verify_platform(&self, url: &str, platform: &str) {
        match self.extractor.probe(url).await {
            Ok(info) => {
                let extractor = info.extractor_key.unwrap_or_default().to_lowercase();
                if !extractor.contains(&platform.to_lowercase()) {
                    tracing::warn!(
                        "URL might not be a valid {} link. Extractor: {}",
                        platform,
                        extractor
                    );
                }
            }
            Err(e) => tracing::warn!("Error verifying URL: {}", e),
        }
    }
}

/// Everything the background task needs for one job.
struct Worker {
    store: Arc<JobStore>,
    extractor: Arc<dyn Extractor>,
    post: MediaPostProcessor,
    options: ExtractOptions,
    url: String,
}

impl Worker {
    async fn run(self) -> Result<Option<PathBuf>> {
        self.store.set_phase(JobPhase::Extracting);
        self.store.set_message("Extracting video information...");
        ensure_dir(&self.options.output_dir).await?;

        let reporter = ProgressReporter::new(Arc::clone(&self.store));
        tracing::debug!("Running {} for {}", self.extractor.name(), self.url);
        let extraction = self
            .extractor
            .download(&self.url, &self.options, &reporter)
            .await?;

        if self.options.mode == DownloadMode::Video {
            return Ok(Some(extraction.filename));
        }

        self.store.set_phase(JobPhase::PostProcessing);
        self.store.set_message("Adding metadata...");

        let title_stem = self
            .options
            .file_stem
            .clone()
            .or_else(|| extraction.info.title.as_deref().and_then(sanitize_title));

        match locate_audio_file(
            &extraction.filename,
            &self.options.output_dir,
            title_stem.as_deref(),
        ) {
            Some(path) => {
                self.post.process(&path, &extraction.info).await;
                Ok(Some(path))
            }
            None => {
                tracing::warn!(
                    "Could not find converted audio file for {}",
                    extraction.filename.display()
                );
                Ok(None)
            }
        }
    }
}
