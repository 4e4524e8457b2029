//! Command-line argument definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, DownloadMode, Quality};
use crate::media::MediaKind;

/// Media downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "mediagrab",
    version,
    about = "Download, convert and tag media from video platforms and Instagram",
    long_about = "A CLI tool to download videos or MP3 audio through yt-dlp and to fetch \
                  photos and videos from Instagram posts.\n\n\
                  Audio downloads are tagged with title, artist, album, year, genre and cover art."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Root directory for downloads.
    #[arg(short = 'd', long = "directory", global = true, env = "MEDIAGRAB_DIRECTORY")]
    pub download_directory: Option<PathBuf>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", global = true, env = "MEDIAGRAB_USER_AGENT")]
    pub user_agent: Option<String>,

    /// yt-dlp executable.
    #[arg(long = "yt-dlp", global = true, env = "MEDIAGRAB_YT_DLP")]
    pub yt_dlp: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a video or its audio track.
    Download(DownloadArgs),

    /// Look up the title and thumbnail of a URL.
    Title {
        /// Media page URL.
        url: String,
    },

    /// Save a URL's thumbnail as a jpg.
    Thumbnail {
        /// Media page URL.
        url: String,

        /// Destination folder, relative to the download root.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Instagram post tools.
    #[command(subcommand)]
    Instagram(InstagramCommand),

    /// Print this installation's device id.
    DeviceId,
}

#[derive(ClapArgs, Debug)]
pub struct DownloadArgs {
    /// Media page URL.
    pub url: String,

    /// Maximum video height.
    #[arg(short, long, default_value = "720p", value_parser = parse_quality)]
    pub quality: Quality,

    /// Keep the video or extract MP3 audio.
    #[arg(short, long, value_enum, default_value_t = ModeArg::Video)]
    pub mode: ModeArg,

    /// Destination folder, relative to the download root.
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Expected platform (e.g. youtube); "other" skips the check.
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Don't look up the title before downloading.
    #[arg(long)]
    pub no_title: bool,
}

#[derive(Subcommand, Debug)]
pub enum InstagramCommand {
    /// List the media items of a post as JSON.
    Info {
        /// Post, reel or tv URL.
        url: String,
    },

    /// Download every item of a post.
    Post {
        /// Post, reel or tv URL.
        url: String,

        /// Destination folder, relative to the download root.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Download several direct media URLs as one background job.
    Fetch {
        /// Direct media URLs.
        #[arg(required = true, num_args = 1..)]
        urls: Vec<String>,

        /// Destination folder, relative to the download root.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Download one direct media URL.
    Single {
        /// Direct media URL.
        url: String,

        /// Kind of media behind the URL.
        #[arg(short, long, value_enum, default_value_t = KindArg::Image)]
        kind: KindArg,

        /// Destination folder, relative to the download root.
        #[arg(short, long)]
        folder: Option<String>,
    },
}

/// CLI download mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Video merged to mp4.
    Video,
    /// MP3 audio with tags.
    Audio,
}

impl From<ModeArg> for DownloadMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Video => DownloadMode::Video,
            ModeArg::Audio => DownloadMode::Audio,
        }
    }
}

/// CLI media kind argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Image,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Image => MediaKind::Image,
            KindArg::Video => MediaKind::Video,
        }
    }
}

fn parse_quality(value: &str) -> Result<Quality, String> {
    value.parse()
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.download_directory {
            config.paths.download_directory = Some(dir.clone());
        }

        if let Some(user_agent) = &self.user_agent {
            config.network.user_agent = user_agent.clone();
        }

        if let Some(binary) = &self.yt_dlp {
            config.extractor.binary = binary.clone();
        }
    }
}
