//! Configuration and request validation logic.

use std::path::{Component, Path, PathBuf};

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for user agent.
const MIN_USER_AGENT_LENGTH: usize = 20;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_user_agent(&config.network.user_agent)?;

    if config.network.thumbnail_timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            field: "thumbnail_timeout_secs".to_string(),
            message: "Timeout must be at least 1 second".to_string(),
        });
    }

    if config.extractor.binary.as_os_str().is_empty() {
        return Err(Error::MissingConfig("extractor.binary".to_string()));
    }

    let quality = config.extractor.audio_quality.trim();
    if quality.is_empty() || !quality.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::ConfigValidation {
            field: "audio_quality".to_string(),
            message: format!("Expected a bitrate in kbps, got '{}'", quality),
        });
    }

    if config.instagram.app_id.trim().is_empty() {
        return Err(Error::MissingConfig("instagram.app_id".to_string()));
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    Ok(())
}

/// Validate a submitted media URL.
///
/// Only a blank URL is rejected. Anything else goes to the extraction
/// service, which also understands bare hosts and search prefixes.
pub fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::InvalidInput("URL is required".to_string()));
    }

    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => tracing::debug!("Passing {} URL through: {}", parsed.scheme(), url),
        Err(e) => tracing::warn!("'{}' is not an absolute URL ({}), passing it on", url, e),
    }
    Ok(())
}

/// Resolve a requested destination folder and ensure it stays inside `root`.
///
/// Relative folders are taken relative to `root`; an empty request means
/// `root` itself. The check is lexical so folders that do not exist yet can
/// still be validated.
pub fn secure_path(root: &Path, requested: Option<&str>) -> Result<PathBuf> {
    let root = normalize(&absolute(root)?);

    let requested = requested.map(str::trim).unwrap_or_default();
    if requested.is_empty() {
        return Ok(root);
    }
    if requested.contains('\0') {
        return Err(Error::InvalidPath("Null bytes not allowed".to_string()));
    }

    let candidate = normalize(&root.join(requested));
    if !candidate.starts_with(&root) {
        return Err(Error::InvalidPath(format!(
            "'{}' is outside the download directory",
            requested
        )));
    }

    Ok(candidate)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_audio_quality() {
        let mut config = Config::default();
        config.extractor.audio_quality = "best".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://site/video").is_ok());
        assert!(matches!(validate_url("   "), Err(Error::InvalidInput(_))));
        assert!(validate_url("youtube.com/watch?v=abc").is_ok());
        assert!(validate_url("ytsearch:lofi beats").is_ok());
    }

    #[test]
    fn test_secure_path_empty_is_root() {
        let root = Path::new("/downloads");
        assert_eq!(secure_path(root, None).unwrap(), PathBuf::from("/downloads"));
        assert_eq!(
            secure_path(root, Some("")).unwrap(),
            PathBuf::from("/downloads")
        );
    }

    #[test]
    fn test_secure_path_nested() {
        let root = Path::new("/downloads");
        assert_eq!(
            secure_path(root, Some("music/albums")).unwrap(),
            PathBuf::from("/downloads/music/albums")
        );
        assert_eq!(
            secure_path(root, Some("/downloads/videos")).unwrap(),
            PathBuf::from("/downloads/videos")
        );
        assert_eq!(
            secure_path(root, Some("a/../b")).unwrap(),
            PathBuf::from("/downloads/b")
        );
    }

    #[test]
    fn test_secure_path_rejects_escape() {
        let root = Path::new("/downloads");
        assert!(matches!(
            secure_path(root, Some("../../etc")),
            Err(Error::InvalidPath(_))
        ));
        assert!(secure_path(root, Some("/etc")).is_err());
        assert!(secure_path(root, Some("music/../../etc")).is_err());
    }

    #[test]
    fn test_secure_path_rejects_sibling_prefix() {
        let root = Path::new("/downloads");
        assert!(secure_path(root, Some("/downloads2")).is_err());
    }
}
