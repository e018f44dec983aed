use std::path::{Component, Path, PathBuf};

use tokio::fs::File;
use tracing::debug;

use crate::FileError;

/// Maps URL suffixes to files below a root directory
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file directly inside the root
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Resolve `suffix` to a regular file below the root.
    ///
    /// Suffixes that would leave the root are reported as missing, and
    /// directories (the root included) are refused.
    pub async fn resolve(&self, suffix: &str) -> Result<PathBuf, FileError> {
        let mut path = self.root.clone();

        for component in Path::new(suffix).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::RootDir if path == self.root => {}
                _ => {
                    debug!("Rejecting path outside of static root: {}", suffix);
                    return Err(FileError::NotFound);
                }
            }
        }

        let file = File::open(&path).await.map_err(|_| FileError::NotFound)?;
        let metadata = file.metadata().await.map_err(FileError::Access)?;

        if metadata.is_dir() {
            return Err(FileError::Forbidden);
        }

        Ok(path)
    }
}
