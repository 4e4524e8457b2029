//! Download module.
//!
//! This module provides:
//! - The single-job store and controller
//! - Progress reporting from extractors
//! - Batch, single-item and whole-post media fetches

pub mod bulk;
pub mod controller;
pub mod progress;
pub mod single;
pub mod state;
pub mod stream;

pub use bulk::download_batch;
pub use controller::{Admission, JobController, JobRequest, PauseToggle, TitleInfo};
pub use progress::ProgressReporter;
pub use single::{download_post, download_single_media, PostDownload};
pub use state::{JobId, JobOutcome, JobPhase, JobState, JobStore, StatusSnapshot};
pub use stream::stream_to_file;
