//! Filename generation and manipulation.

use std::path::{Path, PathBuf};

/// Suffix of the metadata file yt-dlp writes next to a download.
pub const SIDECAR_SUFFIX: &str = ".info.json";

/// Turn a media title into a safe file stem.
///
/// Whitespace runs become `_`, anything other than letters, digits, `-`, `_`
/// and `.` is dropped, and leading/trailing `.`/`_` are trimmed. Non-ASCII
/// letters are kept so non-Latin titles still produce a name. Returns `None`
/// when nothing usable is left.
pub fn sanitize_title(title: &str) -> Option<String> {
    let joined = title
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let sanitized: String = joined
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    let trimmed = sanitized.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Path of the `.info.json` sidecar belonging to a media file.
pub fn sidecar_path(media: &Path) -> PathBuf {
    let stem = media.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let name = format!("{}{}", stem, SIDECAR_SUFFIX);
    match media.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Base name of a path as a display string.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Generate a unique filename by appending a number if the file exists.
pub fn make_unique_filename(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut counter = 1;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };

        let new_path = parent.join(&new_name);
        if !new_path.exists() {
            return new_path;
        }

        counter += 1;
        if counter > 1000 {
            return new_path;
        }
    }
}
