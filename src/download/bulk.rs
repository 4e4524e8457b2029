//! Batch download of direct media URLs.

use std::path::Path;

use crate::api::HttpClient;
use crate::download::state::JobStore;
use crate::download::stream::stream_to_file;
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, make_unique_filename};

/// Extension guessed from a direct media URL.
pub fn guess_extension(url: &str) -> &'static str {
    if url.contains("mp4") {
        "mp4"
    } else {
        "jpg"
    }
}

/// Name of the `count`-th successfully fetched file of a batch.
pub fn batch_file_name(url: &str, unix_secs: i64, count: usize) -> String {
    format!("instagram_{}_{}.{}", unix_secs, count, guess_extension(url))
}

/// Percentage shown while item `index` of `total` is in flight.
pub fn batch_progress(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (index * 100 / total) as f64
}

/// Fetch every URL into `folder`, returning how many files were written.
///
/// Failures of single items are logged and skipped. A pause request stops
/// the batch before the next item.
pub async fn download_batch(
    store: &JobStore,
    http: &HttpClient,
    urls: &[String],
    folder: &Path,
) -> Result<usize> {
    ensure_dir(folder).await?;

    let total = urls.len();
    let mut downloaded = 0usize;

    for (i, url) in urls.iter().enumerate() {
        if store.is_paused() {
            return Err(Error::Cancelled);
        }

        store.report(
            batch_progress(i, total),
            format!("Downloading file {} of {}", i + 1, total),
        );

        let name = batch_file_name(url, chrono::Utc::now().timestamp(), downloaded);
        let path = make_unique_filename(&folder.join(&name));

        match stream_to_file(http, url, &path).await {
            Ok(bytes) => {
                tracing::debug!("Saved {} ({} bytes)", path.display(), bytes);
                downloaded += 1;
            }
            Err(e) => tracing::warn!("Error downloading {}: {}", url, e),
        }
    }

    Ok(downloaded)
}
