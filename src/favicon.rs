use std::path::Path;

use tracing::{debug, info};

use crate::{errors::InitializationError, FaviconError};

pub const FAVICON_FILE: &str = "favicon.ico";

/// Create the static directory, parents included, when it does not exist yet
pub async fn ensure_directory(dir: &Path) -> Result<(), InitializationError> {
    if tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(());
    }

    info!("Creating static directory {}", dir.display());
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| InitializationError::directory(dir, e))
}

/// Download the favicon into `dir` unless one is already there.
///
/// Returns whether a file was written.
pub async fn ensure_favicon(dir: &Path, url: &str) -> Result<bool, FaviconError> {
    let path = dir.join(FAVICON_FILE);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        debug!("Favicon present at {}", path.display());
        return Ok(false);
    }

    info!("Downloading favicon from {}", url);
    let body = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| FaviconError::download(url, e))?
        .bytes()
        .await
        .map_err(|e| FaviconError::download(url, e))?;

    tokio::fs::write(&path, &body)
        .await
        .map_err(|e| FaviconError::write(&path, e))?;

    info!("Saved favicon to {} ({} bytes)", path.display(), body.len());
    Ok(true)
}
