//! Filesystem module.
//!
//! Provides:
//! - Download root management
//! - Filename generation and manipulation
//! - Device identity persistence

pub mod device;
pub mod naming;
pub mod paths;

pub use device::device_id;
pub use naming::{display_name, make_unique_filename, sanitize_title, sidecar_path};
pub use paths::{ensure_dir, prepare_download_root};
