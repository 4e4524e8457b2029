//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the folder created under the user's Downloads directory.
const DEFAULT_FOLDER_NAME: &str = "MediaGrab";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub instagram: InstagramConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory every download must stay inside.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,
}

/// HTTP settings shared by thumbnail, media and post requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for cover art requests, in seconds.
    #[serde(default = "default_thumbnail_timeout")]
    pub thumbnail_timeout_secs: u64,

    /// Whether TLS certificates are verified.
    #[serde(default)]
    pub verify_certificates: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            thumbnail_timeout_secs: default_thumbnail_timeout(),
            verify_certificates: false,
        }
    }
}

/// Extraction service (yt-dlp) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// yt-dlp executable name or path.
    #[serde(default = "default_extractor_binary")]
    pub binary: PathBuf,

    /// Directory containing ffmpeg, when it is not on PATH.
    #[serde(default)]
    pub ffmpeg_location: Option<PathBuf>,

    /// MP3 bitrate in kbps used for audio conversion.
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: default_extractor_binary(),
            ffmpeg_location: None,
            audio_quality: default_audio_quality(),
        }
    }
}

/// Instagram API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    /// Web app id sent as `X-IG-App-ID`.
    #[serde(default = "default_instagram_app_id")]
    pub app_id: String,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            app_id: default_instagram_app_id(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_thumbnail_timeout() -> u64 {
    10
}

fn default_extractor_binary() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_audio_quality() -> String {
    "192".to_string()
}

fn default_instagram_app_id() -> String {
    "936619743392459".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective download root.
    pub fn download_directory(&self) -> PathBuf {
        self.paths.download_directory.clone().unwrap_or_else(|| {
            directories::UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(|d| d.join(DEFAULT_FOLDER_NAME)))
                .unwrap_or_else(|| std::env::temp_dir().join("downloads"))
        })
    }
}
