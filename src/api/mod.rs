//! Network clients.
//!
//! This module provides:
//! - A shared HTTP client for thumbnails, media files and JSON
//! - The Instagram media-info backend
//! - Instagram API response types

pub mod client;
pub mod instagram;
pub mod types;

pub use client::HttpClient;
pub use instagram::InstagramClient;
