//! yt-dlp subprocess backend.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::config::{Config, DownloadMode};
use crate::error::{Error, Result};
use crate::extract::traits::{
    ExtractOptions, ExtractedInfo, Extraction, Extractor, ProgressEvent, ProgressSink,
    ProgressStatus,
};

/// Marks progress lines on either stream.
const PROGRESS_PREFIX: &str = "[progress]";

/// Marks the final info JSON line on stdout.
const INFO_PREFIX: &str = "[info]";

const FFMPEG_BIN: &str = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };

/// yt-dlp command-line backend.
pub struct YtDlp {
    binary: PathBuf,
    user_agent: String,
    ffmpeg_location: Option<PathBuf>,
    audio_quality: String,
    verify_certificates: bool,
}

/// Info JSON printed after the file is moved into place.
#[derive(Debug, Deserialize)]
struct InfoRecord {
    #[serde(flatten)]
    info: ExtractedInfo,
    #[serde(default)]
    filepath: Option<PathBuf>,
    #[serde(default, rename = "_filename")]
    filename: Option<PathBuf>,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>, user_agent: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            user_agent: user_agent.into(),
            ffmpeg_location: None,
            audio_quality: "192".to_string(),
            verify_certificates: false,
        }
    }

    /// Build a backend from configuration, looking up ffmpeg once.
    pub fn from_config(config: &Config) -> Self {
        let ffmpeg_location = locate_ffmpeg(config.extractor.ffmpeg_location.as_deref());
        match &ffmpeg_location {
            Some(dir) => tracing::info!("Using ffmpeg from: {}", dir.display()),
            None => tracing::warn!("ffmpeg not found - download quality may be limited"),
        }

        Self {
            binary: config.extractor.binary.clone(),
            user_agent: config.network.user_agent.clone(),
            ffmpeg_location,
            audio_quality: config.extractor.audio_quality.clone(),
            verify_certificates: config.network.verify_certificates,
        }
    }

    fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-warnings".to_string(),
            "--user-agent".to_string(),
            self.user_agent.clone(),
        ];
        if !self.verify_certificates {
            args.push("--no-check-certificates".to_string());
        }
        args
    }

    fn download_args(&self, url: &str, options: &ExtractOptions) -> Vec<String> {
        let mut args = self.common_args();
        args.extend(
            [
                "--no-playlist",
                "--restrict-filenames",
                "--write-info-json",
                "--newline",
                "--progress",
                "--no-simulate",
            ]
            .map(String::from),
        );
        args.push("--progress-template".to_string());
        args.push(format!(
            "download:{}%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s",
            PROGRESS_PREFIX
        ));
        args.push("--print".to_string());
        args.push(format!("after_move:{}%()j", INFO_PREFIX));

        if let Some(dir) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(dir.display().to_string());
        }

        match options.mode {
            DownloadMode::Audio => {
                args.extend(["-f", "bestaudio/best", "-x", "--audio-format", "mp3"].map(String::from));
                args.push("--audio-quality".to_string());
                args.push(format!("{}K", self.audio_quality));
                args.push("--embed-thumbnail".to_string());
            }
            DownloadMode::Video => {
                let height = options.quality.height();
                args.push("-f".to_string());
                args.push(format!(
                    "bestvideo[height<={h}]+bestaudio/best[height<={h}]/best",
                    h = height
                ));
                args.push("--merge-output-format".to_string());
                args.push("mp4".to_string());
            }
        }

        args.push("-o".to_string());
        args.push(options.output_template().display().to_string());
        args.push(url.to_string());
        args
    }

    fn thumbnail_args(&self, url: &str, output_dir: &Path) -> Vec<String> {
        let mut args = self.common_args();
        args.extend(
            [
                "--no-playlist",
                "--write-thumbnail",
                "--skip-download",
                "--convert-thumbnails",
                "jpg",
            ]
            .map(String::from),
        );
        if let Some(dir) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(dir.display().to_string());
        }
        args.push("-o".to_string());
        args.push(output_dir.join("%(title)s.%(ext)s").display().to_string());
        args.push(url.to_string());
        args
    }

    fn spawn_error(&self, err: std::io::Error) -> Error {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::ExtractorNotFound(self.binary.clone())
        } else {
            Error::Io(err)
        }
    }
}

#[async_trait]
impl Extractor for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<ExtractedInfo> {
        let mut args = self.common_args();
        args.extend(["-J", "--flat-playlist", "--no-playlist"].map(String::from));
        args.push(url.to_string());

        tracing::debug!("{} {}", self.binary.display(), args.join(" "));
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extraction(error_message(&stderr)));
        }

        let info: ExtractedInfo = serde_json::from_slice(&output.stdout)?;
        Ok(info)
    }

    async fn download(
        &self,
        url: &str,
        options: &ExtractOptions,
        sink: &dyn ProgressSink,
    ) -> Result<Extraction> {
        let args = self.download_args(url, options);
        tracing::debug!("{} {}", self.binary.display(), args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Extraction("yt-dlp stdout unavailable".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Extraction("yt-dlp stderr unavailable".into()))?;

        // `--print` puts yt-dlp in quiet mode, which sends progress to stderr.
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<String>();
        let stderr_task = tokio::spawn(async move {
            let mut rest = String::new();
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match line.strip_prefix(PROGRESS_PREFIX) {
                    Some(progress) => {
                        let _ = progress_tx.send(progress.to_string());
                    }
                    None => {
                        rest.push_str(&line);
                        rest.push('\n');
                    }
                }
            }
            rest
        });

        let mut record: Option<InfoRecord> = None;
        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stdout_open = true;
        let mut progress_open = true;

        loop {
            let progress = tokio::select! {
                line = stdout_lines.next_line(), if stdout_open => match line? {
                    Some(line) => {
                        if let Some(rest) = line.strip_prefix(PROGRESS_PREFIX) {
                            Some(rest.to_string())
                        } else if let Some(rest) = line.strip_prefix(INFO_PREFIX) {
                            record = Some(serde_json::from_str(rest)?);
                            None
                        } else {
                            tracing::debug!("yt-dlp> {}", line);
                            None
                        }
                    }
                    None => {
                        stdout_open = false;
                        None
                    }
                },
                progress = progress_rx.recv(), if progress_open => {
                    if progress.is_none() {
                        progress_open = false;
                    }
                    progress
                }
                else => break,
            };

            let Some(event) = progress.as_deref().and_then(parse_progress_line) else {
                continue;
            };
            if let Err(e) = sink.on_event(event) {
                tracing::info!("Stopping yt-dlp: {}", e);
                let _ = child.kill().await;
                return Err(e);
            }
        }

        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(Error::Extraction(error_message(&stderr)));
        }

        let record =
            record.ok_or_else(|| Error::Extraction("yt-dlp returned no metadata".into()))?;
        let filename = record
            .filepath
            .or(record.filename)
            .ok_or_else(|| Error::Extraction("yt-dlp did not report an output file".into()))?;

        Ok(Extraction {
            info: record.info,
            filename,
        })
    }

    async fn download_thumbnail(&self, url: &str, output_dir: &Path) -> Result<()> {
        let args = self.thumbnail_args(url, output_dir);
        tracing::debug!("{} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extraction(error_message(&stderr)));
        }
        Ok(())
    }
}

/// Find the directory containing ffmpeg: the configured one, else PATH.
pub fn locate_ffmpeg(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        if dir.join(FFMPEG_BIN).is_file() {
            return Some(dir.to_path_buf());
        }
        tracing::warn!("No {} in configured location {}", FFMPEG_BIN, dir.display());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).find(|dir| dir.join(FFMPEG_BIN).is_file())
}

/// Parse `status|downloaded|total|estimate` as printed by the progress template.
fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let mut fields = line.trim().split('|');

    let status = match fields.next()? {
        "downloading" => ProgressStatus::Downloading,
        "finished" => ProgressStatus::Finished,
        "error" => ProgressStatus::Error,
        _ => return None,
    };

    Some(ProgressEvent {
        status,
        downloaded_bytes: fields.next().and_then(parse_count),
        total_bytes: fields.next().and_then(parse_count),
        total_bytes_estimate: fields.next().and_then(parse_count),
    })
}

/// yt-dlp prints `NA` for missing fields and floats for estimates.
fn parse_count(field: &str) -> Option<u64> {
    let field = field.trim();
    field
        .parse::<u64>()
        .ok()
        .or_else(|| field.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
}

/// Pick the most useful line out of yt-dlp's stderr.
fn error_message(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp exited with an error".to_string())
}
