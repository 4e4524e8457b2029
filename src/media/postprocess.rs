//! Audio post-processing: locate the converted file, tag it, clean up.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::HttpClient;
use crate::config::Config;
use crate::extract::ExtractedInfo;
use crate::fs::naming::sidecar_path;
use crate::media::tagging::TagSet;

/// Extension of converted audio files.
const AUDIO_EXTENSION: &str = "mp3";

/// Ways to derive the converted file's path, probed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRule {
    /// The reported file itself, when it is already an MP3.
    Direct,
    /// The reported file with its extension replaced.
    ReplaceExtension,
    /// Literal `.webm`/`.m4a` to `.mp3` substitution on the reported path.
    SubstituteSuffix,
    /// The reported base name inside the destination folder.
    BaseNameInFolder,
    /// The sanitized title inside the destination folder.
    SanitizedTitle,
}

pub const CANDIDATE_RULES: &[CandidateRule] = &[
    CandidateRule::Direct,
    CandidateRule::ReplaceExtension,
    CandidateRule::SubstituteSuffix,
    CandidateRule::BaseNameInFolder,
    CandidateRule::SanitizedTitle,
];

impl CandidateRule {
    fn candidate(&self, reported: &Path, folder: &Path, title_stem: Option<&str>) -> Option<PathBuf> {
        let mp3_name = |stem: &str| format!("{}.{}", stem, AUDIO_EXTENSION);

        match self {
            CandidateRule::Direct => reported
                .extension()
                .filter(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
                .map(|_| reported.to_path_buf()),
            CandidateRule::ReplaceExtension => Some(reported.with_extension(AUDIO_EXTENSION)),
            CandidateRule::SubstituteSuffix => {
                let original = reported.to_string_lossy();
                let substituted = original.replace(".webm", ".mp3").replace(".m4a", ".mp3");
                (substituted != original).then(|| PathBuf::from(substituted))
            }
            CandidateRule::BaseNameInFolder => reported
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| folder.join(mp3_name(stem))),
            CandidateRule::SanitizedTitle => title_stem.map(|stem| folder.join(mp3_name(stem))),
        }
    }
}

/// All candidate paths for a converted file, in probe order, without repeats.
pub fn candidate_paths(reported: &Path, folder: &Path, title_stem: Option<&str>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for rule in CANDIDATE_RULES {
        if let Some(path) = rule.candidate(reported, folder, title_stem) {
            if !out.contains(&path) {
                out.push(path);
            }
        }
    }
    out
}

/// First candidate that exists on disk.
pub fn locate_audio_file(reported: &Path, folder: &Path, title_stem: Option<&str>) -> Option<PathBuf> {
    candidate_paths(reported, folder, title_stem)
        .into_iter()
        .find(|p| p.is_file())
}

/// Tags converted audio and removes leftovers. Never fails the job.
#[derive(Clone)]
pub struct MediaPostProcessor {
    http: HttpClient,
    thumbnail_timeout: Duration,
}

impl MediaPostProcessor {
    pub fn new(http: HttpClient, thumbnail_timeout: Duration) -> Self {
        Self {
            http,
            thumbnail_timeout,
        }
    }

    pub fn from_config(http: HttpClient, config: &Config) -> Self {
        Self::new(
            http,
            Duration::from_secs(config.network.thumbnail_timeout_secs),
        )
    }

    /// Fetch cover art; any failure means no cover.
    pub async fn fetch_thumbnail(&self, info: &ExtractedInfo) -> Option<Vec<u8>> {
        let url = info.thumbnail_url.as_deref().filter(|u| !u.is_empty())?;

        match self.http.fetch_bytes(url, self.thumbnail_timeout).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Could not download thumbnail: {}", e);
                None
            }
        }
    }

    /// Write tags into `path` and remove its `.info.json` sidecar.
    pub fn apply(&self, path: &Path, info: &ExtractedInfo, thumbnail: Option<&[u8]>) {
        apply_metadata(path, info, thumbnail);
    }

    /// Fetch the thumbnail, then tag on the blocking pool.
    pub async fn process(&self, path: &Path, info: &ExtractedInfo) {
        let thumbnail = self.fetch_thumbnail(info).await;

        let path = path.to_path_buf();
        let info = info.clone();
        let result = tokio::task::spawn_blocking(move || {
            apply_metadata(&path, &info, thumbnail.as_deref());
        })
        .await;

        if let Err(e) = result {
            tracing::warn!("Metadata task failed: {}", e);
        }
    }
}

fn apply_metadata(path: &Path, info: &ExtractedInfo, thumbnail: Option<&[u8]>) {
    let tags = TagSet::from_info(info, thumbnail);
    match tags.write_to(path) {
        Ok(()) => tracing::info!("Metadata added to: {}", path.display()),
        Err(e) => tracing::warn!("Error adding metadata to {}: {}", path.display(), e),
    }

    let sidecar = sidecar_path(path);
    if sidecar.exists() {
        if let Err(e) = std::fs::remove_file(&sidecar) {
            tracing::debug!("Could not remove {}: {}", sidecar.display(), e);
        }
    }
}
