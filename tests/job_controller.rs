//! Job controller behaviour against a scripted extractor.

mod common;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_test::assert_ok;

use mediagrab::api::HttpClient;
use mediagrab::download::{JobController, JobOutcome, JobPhase, JobRequest};
use mediagrab::error::{Error, Result};
use mediagrab::extract::{
    ExtractOptions, ExtractedInfo, Extraction, Extractor, ProgressEvent, ProgressSink,
};
use mediagrab::media::MediaPostProcessor;
use mediagrab::social::{Post, PostBody, PostNode, PostSource, SocialMediaResolver};
use mediagrab::DownloadMode;

use common::MediaServer;

/// Extractor that reports progress, then blocks until the test opens its gate.
struct GatedExtractor {
    gate: Arc<Notify>,
    title: String,
    thumbnail: Option<String>,
}

#[async_trait]
impl Extractor for GatedExtractor {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn probe(&self, url: &str) -> Result<ExtractedInfo> {
        if url.contains("fail") {
            return Err(Error::Extraction(
                "ERROR: Unsupported URL\nmore detail".to_string(),
            ));
        }
        Ok(self.info())
    }

    async fn download(
        &self,
        _url: &str,
        options: &ExtractOptions,
        sink: &dyn ProgressSink,
    ) -> Result<Extraction> {
        sink.on_event(ProgressEvent::downloading(25, 100))?;
        self.gate.notified().await;
        sink.on_event(ProgressEvent::downloading(100, 100))?;
        sink.on_event(ProgressEvent::finished())?;

        let stem = options.file_stem.clone().unwrap_or_else(|| "video".to_string());
        let (reported, written) = match options.mode {
            DownloadMode::Video => {
                let path = options.output_dir.join(format!("{}.mp4", stem));
                (path.clone(), path)
            }
            DownloadMode::Audio => (
                options.output_dir.join(format!("{}.webm", stem)),
                options.output_dir.join(format!("{}.mp3", stem)),
            ),
        };
        std::fs::write(&written, b"")?;
        std::fs::write(options.output_dir.join(format!("{}.info.json", stem)), b"{}")?;

        Ok(Extraction {
            info: self.info(),
            filename: reported,
        })
    }

    async fn download_thumbnail(&self, url: &str, output_dir: &Path) -> Result<()> {
        if url.contains("fail") {
            return Err(Error::Extraction("ERROR: Unsupported URL".to_string()));
        }
        std::fs::write(output_dir.join(format!("{}.jpg", self.title)), b"jpg")?;
        Ok(())
    }
}

impl GatedExtractor {
    fn info(&self) -> ExtractedInfo {
        ExtractedInfo {
            title: Some(self.title.clone()),
            uploader: Some("Test Channel".to_string()),
            upload_date: Some("20240102".to_string()),
            description: Some("live rock session".to_string()),
            thumbnail_url: self.thumbnail.clone(),
            extractor_key: Some("Youtube".to_string()),
            ..Default::default()
        }
    }
}

struct EmptySource;

#[async_trait]
impl PostSource for EmptySource {
    async fn fetch_post(&self, shortcode: &str) -> Result<Post> {
        Ok(Post {
            shortcode: shortcode.to_string(),
            caption: None,
            body: PostBody::Single(PostNode {
                is_video: false,
                display_url: "http://127.0.0.1:9/p.jpg".to_string(),
                video_url: None,
            }),
        })
    }
}

fn controller(root: &Path, title: &str) -> (JobController, Arc<Notify>) {
    controller_with_cover(root, title, None)
}

fn controller_with_cover(
    root: &Path,
    title: &str,
    thumbnail: Option<String>,
) -> (JobController, Arc<Notify>) {
    let gate = Arc::new(Notify::new());
    let http = HttpClient::new("mediagrab-tests/1.0 (integration tests)", true).unwrap();
    let controller = JobController::new(
        root,
        Arc::new(GatedExtractor {
            gate: Arc::clone(&gate),
            title: title.to_string(),
            thumbnail,
        }),
        MediaPostProcessor::new(http.clone(), Duration::from_secs(5)),
        http,
        SocialMediaResolver::new(Arc::new(EmptySource)),
    );
    (controller, gate)
}

/// Poll the status until the job reaches `phase`.
async fn wait_for_phase(controller: &JobController, phase: JobPhase) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while controller.status().phase != phase {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

fn request(url: &str) -> JobRequest {
    JobRequest {
        url: url.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn second_submit_is_rejected_while_active() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, gate) = controller(dir.path(), "Clip");

    let first = controller.submit(request("https://example.com/watch?v=1")).await;
    assert!(first.success);
    assert!(first.job_id.is_some());

    let second = controller.submit(request("https://example.com/watch?v=2")).await;
    assert!(!second.success);
    assert_eq!(second.message.as_deref(), Some("another job is active"));

    gate.notify_one();
    let outcome = controller.wait().await.unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn completed_video_job_reports_file() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, gate) = controller(dir.path(), "My Clip");

    let title = controller.fetch_title("https://example.com/watch?v=1").await;
    assert!(title.success);
    assert_eq!(title.title, "My Clip");

    assert!(controller.submit(request("https://example.com/watch?v=1")).await.success);

    wait_for_phase(&controller, JobPhase::Downloading).await;
    let running = controller.status();
    assert!(running.is_downloading);
    assert_eq!(running.progress, 25.0);
    assert_eq!(running.message, "Downloading... 25.0%");

    gate.notify_one();
    controller.wait().await.unwrap();

    let status = controller.status();
    assert!(!status.is_downloading);
    assert_eq!(status.progress, 100.0);
    assert_eq!(status.message, "Download complete!");
    assert_eq!(status.phase, JobPhase::Done);
    assert_eq!(status.current_file.as_deref(), Some("My_Clip.mp4"));
    assert!(dir.path().join("My_Clip.mp4").exists());
}

#[tokio::test]
async fn audio_job_is_tagged_and_cleaned_up() {
    let cover: &[u8] = b"\xff\xd8\xffcover";
    let server = MediaServer::start(&[("/cover.jpg", 200, cover)]).await;
    let dir = tempfile::tempdir().unwrap();
    let (controller, gate) =
        controller_with_cover(dir.path(), "Rock Anthem", Some(server.url("/cover.jpg")));
    controller.fetch_title("https://example.com/watch?v=1").await;

    let admission = controller
        .submit(JobRequest {
            mode: DownloadMode::Audio,
            folder: Some("music".to_string()),
            ..request("https://example.com/watch?v=1")
        })
        .await;
    assert!(admission.success);
    gate.notify_one();

    let outcome = controller.wait().await.unwrap();
    let audio = dir.path().join("music").join("Rock_Anthem.mp3");
    assert_eq!(
        outcome,
        JobOutcome::Succeeded {
            file: Some(audio.clone())
        }
    );
    assert_eq!(
        controller.status().current_file.as_deref(),
        Some("Rock_Anthem.mp3")
    );
    assert!(!dir.path().join("music").join("Rock_Anthem.info.json").exists());

    let tag = assert_ok!(id3::Tag::read_from_path(&audio));
    assert_eq!(id3::TagLike::title(&tag), Some("Rock Anthem"));
    assert_eq!(id3::TagLike::artist(&tag), Some("Test Channel"));
    assert_eq!(id3::TagLike::genre(&tag), Some("Rock"));
    let picture = id3::Tag::pictures(&tag).next().unwrap();
    assert_eq!(picture.data, cover);
}

#[tokio::test]
async fn pause_cancels_running_job() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, gate) = controller(dir.path(), "Clip");

    assert!(controller.submit(request("https://example.com/watch?v=1")).await.success);
    assert!(controller.toggle_pause());
    gate.notify_one();

    assert_eq!(controller.wait().await, Some(JobOutcome::Cancelled));
    let status = controller.status();
    assert_eq!(status.message, "Download paused");
    assert_eq!(status.phase, JobPhase::Paused);
    assert!(!status.is_downloading);

    // Submitting again starts a fresh attempt.
    assert!(controller.submit(request("https://example.com/watch?v=1")).await.success);
    assert!(!controller.status().is_paused);
    gate.notify_one();
    assert!(controller.wait().await.unwrap().is_success());
}

#[tokio::test]
async fn concurrent_submits_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, gate) = controller(dir.path(), "Clip");

    let (a, b) = tokio::join!(
        controller.submit(request("https://example.com/watch?v=1")),
        controller.submit(request("https://example.com/watch?v=2")),
    );
    assert_eq!([a.success, b.success].iter().filter(|s| **s).count(), 1);

    gate.notify_one();
    controller.wait().await;
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _gate) = controller(dir.path(), "Clip");

    let blank = controller.submit(request("   ")).await;
    assert_eq!(blank.message.as_deref(), Some("URL is required"));

    let escape = controller
        .submit(JobRequest {
            folder: Some("../../etc".to_string()),
            ..request("https://example.com/watch?v=1")
        })
        .await;
    assert!(!escape.success);
    assert!(escape.message.unwrap().starts_with("invalid path"));

    assert!(!controller.status().is_downloading);
    assert!(controller.wait().await.is_none());
}

#[tokio::test]
async fn platform_mismatch_does_not_block() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, gate) = controller(dir.path(), "Clip");

    let admission = controller
        .submit(JobRequest {
            platform: Some("vimeo".to_string()),
            ..request("https://example.com/watch?v=1")
        })
        .await;
    assert!(admission.success);

    gate.notify_one();
    controller.wait().await;
}

#[tokio::test]
async fn fetch_title_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _gate) = controller(dir.path(), "Clip");

    let empty = controller.fetch_title("").await;
    assert!(!empty.success);
    assert_eq!(empty.title, "Please enter a video URL");

    let failed = controller.fetch_title("https://example.com/fail").await;
    assert!(!failed.success);
    assert_eq!(failed.title, "Error fetching title: ERROR: Unsupported URL");
    assert!(failed.thumbnail.is_none());
}

#[tokio::test]
async fn bulk_requires_files() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _gate) = controller(dir.path(), "Clip");

    let admission = controller.submit_bulk(Vec::new(), None).await;
    assert!(!admission.success);
    assert_eq!(admission.message.as_deref(), Some("No files selected"));
}

#[tokio::test]
async fn bulk_job_counts_successful_files() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _gate) = controller(dir.path(), "Clip");

    let urls = vec![
        "http://127.0.0.1:9/a.jpg".to_string(),
        "http://127.0.0.1:9/b.mp4".to_string(),
    ];
    let admission = controller.submit_bulk(urls, Some("insta")).await;
    assert!(admission.success);
    assert_eq!(admission.message.as_deref(), Some("Download started"));

    assert!(controller.wait().await.unwrap().is_success());
    let status = controller.status();
    assert_eq!(status.progress, 100.0);
    assert_eq!(status.message, "Downloaded 0 files successfully.");
    assert!(dir.path().join("insta").is_dir());
}

#[tokio::test]
async fn post_download_requires_instagram_url() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _gate) = controller(dir.path(), "Clip");

    let err = controller
        .download_post("https://example.com/p/ABC/", None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please provide a valid Instagram URL");

    let listing = controller
        .media_info("https://www.instagram.com/p/ABC123/")
        .await;
    assert!(listing.success);
    assert_eq!(listing.media.unwrap().len(), 1);
}

#[tokio::test]
async fn thumbnail_is_saved_inside_root() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _gate) = controller(dir.path(), "Clip");

    let folder = controller
        .download_thumbnail("https://example.com/watch?v=1", Some("art"))
        .await
        .unwrap();
    assert!(folder.ends_with("art"));
    assert!(dir.path().join("art").join("Clip.jpg").exists());

    let blank = controller.download_thumbnail(" ", None).await.unwrap_err();
    assert_eq!(blank.to_string(), "URL is required");

    let escape = controller
        .download_thumbnail("https://example.com/watch?v=1", Some("../outside"))
        .await
        .unwrap_err();
    assert!(matches!(escape, Error::InvalidPath(_)));

    let failed = controller
        .download_thumbnail("https://example.com/fail", None)
        .await
        .unwrap_err();
    assert_eq!(
        failed.to_string(),
        "Error downloading thumbnail: ERROR: Unsupported URL"
    );
}

#[tokio::test]
async fn bare_host_urls_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, gate) = controller(dir.path(), "Clip");

    let admission = controller.submit(request("youtube.com/watch?v=abc")).await;
    assert!(admission.success);

    gate.notify_one();
    assert!(controller.wait().await.unwrap().is_success());
}
