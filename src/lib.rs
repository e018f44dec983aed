pub mod config;
pub mod errors;
pub mod favicon;
pub mod http_api;
pub mod logging;
pub mod server;
pub mod static_files;
pub mod stats;

pub use crate::config::{FilesConfig, HttpConfig, LoggingConfig, ServerConfig, StatsConfig};
pub use errors::{
    ConfigValidationError, FaviconError, FileError, InitializationError, IoOperation, ServerError,
};
pub use logging::setup_logging;
pub use server::StaticServer;
pub use static_files::StaticFiles;
pub use stats::{MetricsSource, RequestLedger, StatsSnapshot, StatsTracker, SystemMetrics};

pub const SERVER_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

pub const SERVER_NAME: &str = "Static Server - https://github.com/donuts-are-good/static";
