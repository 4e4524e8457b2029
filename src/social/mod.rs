//! Social-media post resolution.
//!
//! Provides:
//! - Shortcode extraction from post URLs
//! - The `PostSource` seam and post model
//! - Expansion of posts into ordered media items

pub mod resolver;
pub mod shortcode;

pub use resolver::{
    MediaListing, Post, PostBody, PostNode, PostSource, ResolvedPost, SocialMediaResolver,
};
pub use shortcode::{extract_shortcode, is_instagram_url, shortcode_to_media_id};
