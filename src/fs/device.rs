//! Per-installation device identity.

use std::path::Path;

use uuid::Uuid;

/// File holding the device token inside the download root.
pub const DEVICE_ID_FILE: &str = "device_id.txt";

/// Returned when the token can neither be read nor created.
pub const UNKNOWN_DEVICE_ID: &str = "unknown-device-id";

/// Read the device token, creating it on first use.
pub fn device_id(root: &Path) -> String {
    match load_or_create(root) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Error getting device ID: {}", e);
            UNKNOWN_DEVICE_ID.to_string()
        }
    }
}

fn load_or_create(root: &Path) -> std::io::Result<String> {
    std::fs::create_dir_all(root)?;
    let path = root.join(DEVICE_ID_FILE);

    if path.exists() {
        let id = std::fs::read_to_string(&path)?;
        let id = id.trim();
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    let id = Uuid::new_v4().to_string();
    std::fs::write(&path, &id)?;
    tracing::debug!("Created device ID {}", id);
    Ok(id)
}
