//! Download mode and quality definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Keep the video, merged to mp4 (default).
    #[default]
    Video,
    /// Extract audio to a tagged MP3.
    Audio,
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Video => write!(f, "Video"),
            DownloadMode::Audio => write!(f, "Audio"),
        }
    }
}

impl FromStr for DownloadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(DownloadMode::Video),
            "audio" => Ok(DownloadMode::Audio),
            _ => Err(format!("Unknown download mode: {}", s)),
        }
    }
}

/// Resolution tiers offered for video downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "144p")]
    P144,
    #[serde(rename = "240p")]
    P240,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "1440p")]
    P1440,
    #[serde(rename = "2160p")]
    P2160,
}

impl Quality {
    /// All tiers, lowest first.
    pub const ALL: [Quality; 8] = [
        Quality::P144,
        Quality::P240,
        Quality::P360,
        Quality::P480,
        Quality::P720,
        Quality::P1080,
        Quality::P1440,
        Quality::P2160,
    ];

    /// Maximum frame height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            Quality::P144 => 144,
            Quality::P240 => 240,
            Quality::P360 => 360,
            Quality::P480 => 480,
            Quality::P720 => 720,
            Quality::P1080 => 1080,
            Quality::P1440 => 1440,
            Quality::P2160 => 2160,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.height())
    }
}

impl FromStr for Quality {
    type Err = String;

    /// Accepts both `720p` and `720`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let digits = trimmed.strip_suffix('p').unwrap_or(&trimmed);
        let height: u32 = digits
            .parse()
            .map_err(|_| format!("Unknown quality: {}", s))?;

        Quality::ALL
            .iter()
            .copied()
            .find(|q| q.height() == height)
            .ok_or_else(|| format!("Unknown quality: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_parse() {
        assert_eq!("720p".parse::<Quality>().unwrap(), Quality::P720);
        assert_eq!("1080".parse::<Quality>().unwrap(), Quality::P1080);
        assert_eq!("2160P".parse::<Quality>().unwrap(), Quality::P2160);
        assert!("999p".parse::<Quality>().is_err());
        assert!("best".parse::<Quality>().is_err());
    }

    #[test]
    fn test_quality_display() {
        assert_eq!(Quality::P144.to_string(), "144p");
        assert_eq!(Quality::ALL.len(), 8);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Audio".parse::<DownloadMode>().unwrap(), DownloadMode::Audio);
        assert_eq!("video".parse::<DownloadMode>().unwrap(), DownloadMode::Video);
        assert!("podcast".parse::<DownloadMode>().is_err());
    }
}
