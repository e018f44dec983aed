use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::{errors::InitializationError, LoggingConfig, ServerError};

const LOG_FILE_PREFIX: &str = "static-server.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for as
/// long as the process logs to `log_dir`.
pub fn setup_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ServerError> {
    // Validate logging config before proceeding
    config.validate()?;

    let timer = OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        time::format_description::well_known::Rfc3339,
    );

    let env_filter = EnvFilter::default().add_directive(config.get_level_filter().into());

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(config.thread_ids)
        .with_thread_names(config.thread_names)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_level(true)
        .with_timer(timer.clone());

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    if config.is_json() {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.boxed());
    }

    let mut guard = None;
    if let Some(log_dir) = &config.log_dir {
        let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);

        let file = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_timer(timer)
            .with_writer(writer);

        layers.push(if config.is_json() {
            file.json().boxed()
        } else {
            file.boxed()
        });
        guard = Some(file_guard);
    }

    Registry::default()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| {
            ServerError::Init(InitializationError::logging(format!(
                "Failed to initialize logging: {}",
                e
            )))
        })?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use crate::LoggingConfig;

    #[test]
    fn test_log_config_validation() {
        let config = LoggingConfig {
            level: "invalid".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LoggingConfig {
            level: "DEBUG".to_string(),
            format: "json".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.is_json());
    }

    #[test]
    fn test_level_filter() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(config.get_level_filter(), LevelFilter::DEBUG);

        let config = LoggingConfig {
            level: "invalid".to_string(),
            ..Default::default()
        };
        assert_eq!(config.get_level_filter(), LevelFilter::INFO); // fallback
    }

    #[test]
    fn test_setup_rejects_invalid_config() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(super::setup_logging(&config).is_err());
    }
}
