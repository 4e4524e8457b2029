//! Extraction service module.
//!
//! This module provides:
//! - The `Extractor` trait and its progress contract
//! - A yt-dlp subprocess backend

pub mod traits;
pub mod ytdlp;

pub use traits::{
    ExtractOptions, ExtractedInfo, Extraction, Extractor, ProgressEvent, ProgressSink,
    ProgressStatus,
};
pub use ytdlp::{locate_ffmpeg, YtDlp};
