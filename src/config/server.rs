use std::path::Path;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use humantime_serde::re::humantime;
use serde::{Deserialize, Serialize};

use crate::ConfigValidationError;

use super::{FilesConfig, HttpConfig, LoggingConfig, StatsConfig};

/// Main application configuration
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Static files configuration
    #[serde(default)]
    pub files: FilesConfig,

    /// Request statistics configuration
    #[serde(default)]
    pub stats: StatsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Default configuration directory
    pub const CONFIG_DIR: &'static str = "config";

    /// Environment variable prefix
    const ENV_PREFIX: &'static str = "STATIC_SERVER";

    /// Build configuration using the following priority (highest to lowest):
    /// 1. Environment variables (STATIC_SERVER_<SECTION>__<KEY>)
    /// 2. Local configuration file (config/local.yaml)
    /// 3. Environment specific file (config/{RUN_MODE}.yaml)
    /// 4. Default configuration (config/default.yaml)
    /// 5. Built-in defaults
    ///
    /// The result is not validated, command line overrides are applied on
    /// top before calling [`Config::validate`].
    pub fn new() -> Result<Self, ConfigValidationError> {
        let environment = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Self::builder()?
            .add_source(
                File::new(&format!("{}/default", Self::CONFIG_DIR), FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                File::new(
                    &format!("{}/{}", Self::CONFIG_DIR, environment),
                    FileFormat::Yaml,
                )
                .required(false),
            )
            .add_source(
                File::new(&format!("{}/local", Self::CONFIG_DIR), FileFormat::Yaml).required(false),
            )
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a specific file, environment variables still
    /// take precedence
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigValidationError> {
        let config = Self::builder()?
            .add_source(File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigValidationError> {
        let defaults = Config::default();

        let builder = ConfigBuilder::builder()
            // HTTP configuration
            .set_default("http.bind_addr", defaults.http.bind_addr)?
            .set_default("http.bind_port", i64::from(defaults.http.bind_port))?
            // Files configuration
            .set_default(
                "files.directory",
                defaults.files.directory.to_string_lossy().into_owned(),
            )?
            // Stats configuration
            .set_default(
                "stats.window",
                humantime::format_duration(defaults.stats.window).to_string(),
            )?
            // Logging configuration
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default(
                "logging.include_location",
                defaults.logging.include_location,
            )?;

        Ok(builder)
    }

    fn environment() -> Environment {
        Environment::with_prefix(Self::ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.http.bind_addr.is_empty() {
            return Err(ConfigValidationError::http("bind address must not be empty"));
        }
        if self.http.bind_port == 0 {
            return Err(ConfigValidationError::http("port must be non-zero"));
        }

        if self.files.directory.as_os_str().is_empty() {
            return Err(ConfigValidationError::files("directory must not be empty"));
        }

        if self.stats.window.is_zero() {
            return Err(ConfigValidationError::stats("window must be non-zero"));
        }
        if self.stats.prune_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(ConfigValidationError::stats(
                "prune interval must be non-zero when set",
            ));
        }

        self.logging.validate()?;

        Ok(())
    }
}
