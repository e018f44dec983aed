mod config;
mod favicon;
mod file;
mod init;
mod io_operation;
mod server;

pub use self::config::ConfigValidationError;
pub use favicon::FaviconError;
pub use file::{error_response, FileError};
pub use init::InitializationError;
pub use io_operation::IoOperation;
pub use server::ServerError;
