//! asset-dl - bulk asset blob downloader
//!
//! Entry point for the CLI application.

use asset_dl::config::DEFAULT_CONFIG_FILE;
use asset_dl::{AssetDownloader, Config};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Download every blob listed in the asset index
#[derive(Debug, Parser)]
#[command(name = "asset-dl", version, about)]
struct Cli {
    /// JSON configuration file (defaults to ./asset-dl.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Destination root, overrides `save_root`
    #[arg(long)]
    save_root: Option<PathBuf>,

    /// Skip files that already exist under the save root
    #[arg(long)]
    skip_existing: bool,

    /// Log per-transfer start and finish lines
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            setup_logging(cli.verbose);
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(config.debug);

    let downloader = match AssetDownloader::new(config) {
        Ok(downloader) => downloader,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match downloader.run().await {
        Ok(summary) => {
            println!(
                "Done downloading ({} downloaded, {} failed, {} skipped, {} decoded). Check for any errors above.",
                summary.downloaded,
                summary.failed,
                summary.skipped_existing,
                summary.decompressed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// File (if any), then environment, then command line.
fn load_config(cli: &Cli) -> asset_dl::Result<Config> {
    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    let mut config = match &cli.config {
        Some(path) => Config::read(path)?,
        None if default_path.is_file() => Config::read(&default_path)?,
        None => Config::default(),
    };
    config.apply_env_overrides();

    if let Some(save_root) = &cli.save_root {
        config.save_root = save_root.clone();
    }
    if cli.skip_existing {
        config.skip_existing = true;
    }
    if cli.verbose {
        config.debug = true;
    }

    config.validate()?;
    Ok(config)
}

fn setup_logging(debug: bool) {
    let fallback = if debug {
        "asset_dl=debug,warn"
    } else {
        "asset_dl=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
