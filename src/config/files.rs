use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FAVICON_URL: &str =
    "https://raw.githubusercontent.com/donuts-are-good/static/master/favicon.ico";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory static files are served from
    pub directory: PathBuf,
    /// Where to fetch favicon.ico from when the directory has none.
    /// Unset or empty skips the download.
    pub favicon_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./web"),
            favicon_url: Some(DEFAULT_FAVICON_URL.to_string()),
        }
    }
}

impl Config {
    pub fn favicon_url(&self) -> Option<&str> {
        self.favicon_url.as_deref().filter(|url| !url.is_empty())
    }
}
