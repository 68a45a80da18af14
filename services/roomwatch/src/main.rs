//! Roomwatch CLI
//!
//! Runs a single watch cycle. Meant to be invoked periodically by cron or a
//! systemd timer.

use std::path::PathBuf;

use clap::Parser;
use roomwatch::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "roomwatch")]
#[command(about = "Reservation page availability watcher with push notifications")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file path (overrides config file)
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Activity log path (overrides config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// dotenv file holding notifier credentials
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, state_file={:?}, log_file={:?}, env_file={:?}, log_level={:?}",
        args.config,
        args.state_file,
        args.log_file,
        args.env_file,
        args.log_level
    );

    match dotenvy::from_path(&args.env_file) {
        Ok(()) => tracing::debug!("Loaded environment from {:?}", args.env_file),
        Err(e) if e.not_found() => {
            tracing::debug!("No env file at {:?}", args.env_file)
        }
        Err(e) => tracing::warn!("Ignoring env file {:?}: {}", args.env_file, e),
    }

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets()?;

    if let Some(state_file) = args.state_file {
        config.storage.state_file = state_file;
    }
    if let Some(log_file) = args.log_file {
        config.storage.log_file = log_file;
    }

    if config.targets.is_empty() {
        tracing::warn!("No targets configured");
    }

    tracing::info!("Starting roomwatch cycle");
    tracing::debug!(
        "Targets: {}, Notifiers: {}",
        config.targets.len(),
        config.notifiers.len()
    );

    roomwatch::run_reporting(config, |report| println!("{}", report.status_line())).await?;

    Ok(())
}
