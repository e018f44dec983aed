use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaviconError {
    #[error("Failed to download favicon from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to write favicon to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FaviconError {
    pub fn download(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Download {
            url: url.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
