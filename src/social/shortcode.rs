//! Post URL parsing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Post path patterns, tried in order.
static SHORTCODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"instagram\.com/p/([^/?]+)",
        r"instagram\.com/reel/([^/?]+)",
        r"instagram\.com/tv/([^/?]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid shortcode pattern"))
    .collect()
});

/// Alphabet used to encode numeric media ids as shortcodes.
const SHORTCODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Extract the post shortcode from a URL.
pub fn extract_shortcode(url: &str) -> Option<String> {
    SHORTCODE_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether the URL points at Instagram at all.
pub fn is_instagram_url(url: &str) -> bool {
    url.contains("instagram.com")
}

/// Decode a shortcode into the numeric media id used by the API.
pub fn shortcode_to_media_id(shortcode: &str) -> Option<String> {
    if shortcode.trim().is_empty() {
        return None;
    }

    let mut value: u128 = 0;
    for ch in shortcode.chars() {
        let index = SHORTCODE_ALPHABET.find(ch)? as u128;
        value = value.checked_mul(64)?.checked_add(index)?;
    }
    Some(value.to_string())
}
