//! Configuration module for mediagrab.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Download mode and quality definitions
//! - Configuration and request validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, ExtractorConfig, InstagramConfig, NetworkConfig, PathsConfig};
pub use modes::{DownloadMode, Quality};
pub use validation::{secure_path, validate_config, validate_url};
