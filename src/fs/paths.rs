//! Download directory management.

use std::path::Path;

use crate::error::Result;

/// Marker written the first time the download root is created.
const FIRST_RUN_FILE: &str = "first_run.txt";

/// Create the download root if needed.
///
/// Returns `true` when the directory did not exist before; a first-run
/// marker is written in that case.
pub fn prepare_download_root(root: &Path) -> Result<bool> {
    if root.exists() {
        return Ok(false);
    }

    std::fs::create_dir_all(root)?;
    std::fs::write(
        root.join(FIRST_RUN_FILE),
        "This file indicates the program was run for the first time.\n",
    )?;
    tracing::info!("Created download directory: {}", root.display());

    Ok(true)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}
