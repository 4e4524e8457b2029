//! Error types for the mediagrab application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Request errors (rejected before any job starts)
    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("another job is active")]
    JobActive,

    // External service errors
    #[error("{0}")]
    Extraction(String),

    #[error("Extractor not found: {}. Install yt-dlp and ensure it's in your PATH.", .0.display())]
    ExtractorNotFound(PathBuf),

    #[error("Could not resolve post: {0}")]
    Resolve(String),

    #[error("Download failed: {0}")]
    Download(String),

    // Raised by the progress reporter when the user pauses a job.
    #[error("Download paused")]
    Cancelled,

    // Post-processing errors
    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// First line of the display message, as shown in job status.
    pub fn headline(&self) -> String {
        self.to_string().lines().next().unwrap_or_default().to_string()
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CANCELLED: i32 = 1;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
