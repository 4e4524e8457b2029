//! Streaming a remote file to disk.

use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::HttpClient;
use crate::error::{Error, Result};

/// Download `url` into `output_path`, returning the number of bytes written.
///
/// A partially written file is removed when the transfer fails.
pub async fn stream_to_file(
    http: &HttpClient,
    url: &str,
    output_path: &Path,
) -> Result<u64> {
    let response = http.download_file(url).await?;
    if let Some(length) = response.content_length() {
        tracing::debug!("{} bytes expected for {}", length, output_path.display());
    }

    let mut file = File::create(output_path).await?;
    let result = async {
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }

        file.flush().await?;
        Ok::<u64, Error>(downloaded)
    }
    .await;

    if result.is_err() {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(output_path).await {
            tracing::debug!("Could not remove partial {}: {}", output_path.display(), e);
        }
    }

    result
}
