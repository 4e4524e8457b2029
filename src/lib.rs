//! mediagrab - fetch, convert and tag media from the web
//!
//! This library runs one background download job at a time and post-processes
//! its result.
//!
//! # Features
//!
//! - Video or MP3 audio downloads through yt-dlp
//! - Progress reporting with pause (cancel-and-restart)
//! - ID3v2.4 tagging with genre guessing and cover art
//! - Instagram post resolution, including multi-item posts
//! - Batch and single-item direct media downloads
//!
//! # Example
//!
//! ```no_run
//! use mediagrab::{Config, JobController, JobRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let controller = JobController::from_config(&config)?;
//!
//!     let admission = controller
//!         .submit(JobRequest {
//!             url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
//!             ..Default::default()
//!         })
//!         .await;
//!
//!     if admission.is_accepted() {
//!         let outcome = controller.wait().await;
//!         println!("{:?} / {}", outcome, controller.status().message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod fs;
pub mod media;
pub mod output;
pub mod social;

// Re-exports for convenience
pub use config::{Config, DownloadMode, Quality};
pub use download::{
    Admission, JobController, JobId, JobOutcome, JobPhase, JobRequest, PauseToggle,
    StatusSnapshot, TitleInfo,
};
pub use error::{Error, Result};
pub use extract::{ExtractedInfo, Extractor};
pub use media::{MediaItem, MediaKind};
pub use social::{MediaListing, PostSource, SocialMediaResolver};
