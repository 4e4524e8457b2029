//! Media module: items, genre guessing, tagging and post-processing.

pub mod genre;
pub mod item;
pub mod postprocess;
pub mod tagging;

pub use genre::classify;
pub use item::{MediaItem, MediaKind};
pub use postprocess::{candidate_paths, locate_audio_file, CandidateRule, MediaPostProcessor};
pub use tagging::TagSet;
