use clap::{Args, Parser};
use humantime_serde::re::humantime;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{error, info};

use static_server::{setup_logging, ServerConfig, StaticServer};

const AFTER_HELP: &str = "\
Static Server serves static files efficiently. Directory listing is turned off.

Examples:
  Run the server with default settings:
    $ static-server
  Run the server on a different port:
    $ static-server --port 8080
  Serve static files from a different directory:
    $ static-server --directory /path/to/static/files
  Change the duration for calculating request statistics:
    $ static-server --statswindow 120s

Endpoints:
  /             Serves the 'it works' page
  /stats        Server statistics in JSON format
  /favicon.ico  Serves the favicon
  /static/      Serves static files from the configured directory";

#[derive(Parser)]
#[command(author, version, about, after_help = AFTER_HELP)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to the config file, config/*.yaml and the environment are used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dump default config and exit
    #[arg(long = "dump-default-config")]
    dump_default: bool,
}

/// Settings that take precedence over every config source
#[derive(Args)]
struct Overrides {
    /// Port to listen on [default: 3456]
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory from which static files are served [default: ./web]
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Duration for calculating request statistics, e.g. 60s or 2m [default: 60s]
    #[arg(long = "statswindow", value_parser = humantime::parse_duration)]
    stats_window: Option<Duration>,
}

impl Overrides {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.http.bind_port = port;
        }
        if let Some(directory) = self.directory {
            config.files.directory = directory;
        }
        if let Some(window) = self.stats_window {
            config.stats.window = window;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line args
    let cli = Cli::parse();

    if cli.common.dump_default {
        let config = ServerConfig::default();
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    // Load config
    let mut config = match &cli.common.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::new()?,
    };
    cli.overrides.apply(&mut config);
    config.validate()?;

    // Initialize logging
    let _log_guard = setup_logging(&config.logging)?;

    if let Some(path) = &cli.common.config {
        info!("Loaded config from {}", path.display());
    }

    // Create and run server
    let server = Arc::new(StaticServer::new(config)?);

    server
        .run_until(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C"),
                Err(e) => {
                    error!("Unable to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    Ok(())
}
