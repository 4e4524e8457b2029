//! Direct media fetches against a local HTTP responder.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MediaServer;
use mediagrab::api::{HttpClient, InstagramClient};
use mediagrab::download::{
    download_batch, download_post, download_single_media, stream_to_file, JobStore,
};
use mediagrab::extract::ExtractedInfo;
use mediagrab::media::{MediaKind, MediaPostProcessor};
use mediagrab::social::{shortcode_to_media_id, SocialMediaResolver};

const PHOTO: &[u8] = b"\xff\xd8\xffphoto-bytes";
const CLIP: &[u8] = b"\x00\x00\x00\x18ftypmp42clip-bytes";
const COVER: &[u8] = b"\xff\xd8\xffcover-bytes";

fn http() -> HttpClient {
    HttpClient::new("mediagrab-tests/1.0 (integration tests)", true).unwrap()
}

async fn media_server() -> MediaServer {
    MediaServer::start(&[
        ("/media/photo.jpg", 200, PHOTO),
        ("/media/clip.mp4", 200, CLIP),
        ("/cover.jpg", 200, COVER),
    ])
    .await
}

fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn stream_writes_response_body() {
    let server = media_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mp4");

    let written = stream_to_file(&http(), &server.url("/media/clip.mp4"), &path)
        .await
        .unwrap();

    assert_eq!(written, CLIP.len() as u64);
    assert_eq!(std::fs::read(&path).unwrap(), CLIP);
}

#[tokio::test]
async fn stream_leaves_nothing_on_http_error() {
    let server = media_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.jpg");

    let result = stream_to_file(&http(), &server.url("/media/gone.jpg"), &path).await;

    assert!(result.is_err());
    assert!(!path.exists());
}

#[tokio::test]
async fn batch_names_files_by_success_count() {
    let server = media_server().await;
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::new();
    let urls = vec![
        server.url("/media/photo.jpg"),
        server.url("/media/gone.jpg"),
        server.url("/media/clip.mp4"),
    ];

    let count = download_batch(&store, &http(), &urls, dir.path()).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(store.snapshot().message, "Downloading file 3 of 3");

    let names = file_names(dir.path());
    assert_eq!(names.len(), 2);
    let photo = names.iter().find(|n| n.ends_with("_0.jpg")).unwrap();
    let clip = names.iter().find(|n| n.ends_with("_1.mp4")).unwrap();
    assert!(photo.starts_with("instagram_"));
    assert!(clip.starts_with("instagram_"));
    assert_eq!(std::fs::read(dir.path().join(photo)).unwrap(), PHOTO);
    assert_eq!(std::fs::read(dir.path().join(clip)).unwrap(), CLIP);
}

#[tokio::test]
async fn single_media_is_saved_with_timestamp_name() {
    let server = media_server().await;
    let dir = tempfile::tempdir().unwrap();

    let path = download_single_media(
        &http(),
        &server.url("/media/clip.mp4"),
        MediaKind::Video,
        &dir.path().join("single"),
    )
    .await
    .unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("instagram_"));
    assert!(name.ends_with(".mp4"));
    // instagram_YYYYmmdd_HHMMSS.mp4
    assert_eq!(name.len(), "instagram_20240101_000000.mp4".len());
    assert_eq!(std::fs::read(&path).unwrap(), CLIP);
}

#[tokio::test]
async fn single_media_failure_is_returned() {
    let server = media_server().await;
    let dir = tempfile::tempdir().unwrap();

    let result = download_single_media(
        &http(),
        &server.url("/media/gone.jpg"),
        MediaKind::Image,
        dir.path(),
    )
    .await;

    assert!(result.is_err());
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn post_items_are_saved_in_order() {
    let server = media_server().await;
    let media_id = shortcode_to_media_id("ABC123").unwrap();
    let info = serde_json::json!({
        "items": [{
            "media_type": 8,
            "code": "ABC123",
            "carousel_media": [
                {
                    "media_type": 1,
                    "image_versions2": {"candidates": [
                        {"url": server.url("/media/photo.jpg"), "width": 1080, "height": 1080}
                    ]}
                },
                {
                    "media_type": 2,
                    "image_versions2": {"candidates": [
                        {"url": server.url("/media/photo.jpg"), "width": 1080, "height": 1920}
                    ]},
                    "video_versions": [
                        {"url": server.url("/media/clip.mp4"), "width": 1080, "height": 1920}
                    ]
                }
            ]
        }]
    })
    .to_string();
    let info_path = format!("/api/media/{}/info/", media_id);
    let api = MediaServer::start(&[(info_path.as_str(), 200, info.as_bytes())]).await;

    let http = http();
    let client = InstagramClient::new(http.clone(), "1").with_base_url(api.url("/api"));
    let resolver = SocialMediaResolver::new(Arc::new(client));
    let dir = tempfile::tempdir().unwrap();

    let post = download_post(
        &resolver,
        &http,
        "https://www.instagram.com/p/ABC123/",
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(post.files, vec!["ABC123_1.jpg", "ABC123_2.mp4"]);
    assert_eq!(post.caption, "No caption");
    assert_eq!(post.message(), "Downloaded 2 file(s) successfully!");
    assert_eq!(std::fs::read(dir.path().join("ABC123_1.jpg")).unwrap(), PHOTO);
    assert_eq!(std::fs::read(dir.path().join("ABC123_2.mp4")).unwrap(), CLIP);
}

#[tokio::test]
async fn thumbnail_fetch_needs_ok_status() {
    let server = media_server().await;
    let processor = MediaPostProcessor::new(http(), Duration::from_secs(5));

    let found = ExtractedInfo {
        thumbnail_url: Some(server.url("/cover.jpg")),
        ..Default::default()
    };
    assert_eq!(processor.fetch_thumbnail(&found).await.as_deref(), Some(COVER));

    let missing = ExtractedInfo {
        thumbnail_url: Some(server.url("/missing.jpg")),
        ..Default::default()
    };
    assert!(processor.fetch_thumbnail(&missing).await.is_none());
    assert!(processor.fetch_thumbnail(&ExtractedInfo::default()).await.is_none());
}

#[tokio::test]
async fn processed_audio_carries_cover_art() {
    let server = media_server().await;
    let processor = MediaPostProcessor::new(http(), Duration::from_secs(5));
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("Song.mp3");
    std::fs::write(&audio, b"").unwrap();
    std::fs::write(dir.path().join("Song.info.json"), b"{}").unwrap();

    let info = ExtractedInfo {
        title: Some("Song".to_string()),
        uploader: Some("Band".to_string()),
        thumbnail_url: Some(server.url("/cover.jpg")),
        ..Default::default()
    };
    processor.process(&audio, &info).await;

    let tag = id3::Tag::read_from_path(&audio).unwrap();
    let cover = id3::Tag::pictures(&tag).next().unwrap();
    assert_eq!(cover.picture_type, id3::frame::PictureType::CoverFront);
    assert_eq!(cover.data, COVER);
    assert_eq!(file_names(dir.path()), vec!["Song.mp3"]);
}
