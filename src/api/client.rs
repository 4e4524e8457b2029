//! Shared HTTP client.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};

/// HTTP client for thumbnails, media files and JSON APIs.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new client sending `user_agent` on every request.
    pub fn new(user_agent: &str, verify_certificates: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .danger_accept_invalid_certs(!verify_certificates)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.network.user_agent,
            config.network.verify_certificates,
        )
    }

    /// Start a download; the body is left unread for streaming.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }

    /// Fetch a small resource fully into memory, failing on anything but 200.
    pub async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        tracing::debug!("GET {} (timeout {:?})", url, timeout);
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Download(format!("HTTP {} for {}", status, url)));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: header::HeaderMap,
    ) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("Response status: {} ({} bytes)", status, text.len());

        if !status.is_success() {
            return Err(Error::Resolve(format!(
                "HTTP {}: {}",
                status,
                snippet(&text, 200)
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::Resolve(format!(
                "Failed to parse response: {} - Response: {}",
                e,
                snippet(&text, 500)
            ))
        })
    }
}

/// Leading part of a response body for error messages.
fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_respects_char_boundaries() {
        assert_eq!(snippet("أغنية", 2), "أغ");
        assert_eq!(snippet("short", 100), "short");
    }

    #[test]
    fn test_client_builds() {
        assert!(HttpClient::from_config(&Config::default()).is_ok());
    }
}
