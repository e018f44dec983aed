use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("Invalid HTTP configuration: {0}")]
    Http(String),

    #[error("Invalid files configuration: {0}")]
    Files(String),

    #[error("Invalid stats configuration: {0}")]
    Stats(String),

    #[error("Invalid logging configuration: {0}")]
    Logging(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConfigValidationError {
    pub fn http(details: impl Into<String>) -> Self {
        Self::Http(details.into())
    }

    pub fn files(details: impl Into<String>) -> Self {
        Self::Files(details.into())
    }

    pub fn stats(details: impl Into<String>) -> Self {
        Self::Stats(details.into())
    }

    pub fn logging(details: impl Into<String>) -> Self {
        Self::Logging(details.into())
    }

    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }
}

impl From<config::ConfigError> for ConfigValidationError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}
