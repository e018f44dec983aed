mod files;
mod http;
mod logging;
mod server;
mod stats;

pub use files::Config as FilesConfig;
pub use files::DEFAULT_FAVICON_URL;
pub use http::Config as HttpConfig;
pub use logging::Config as LoggingConfig;
pub use server::Config as ServerConfig;
pub use stats::Config as StatsConfig;
