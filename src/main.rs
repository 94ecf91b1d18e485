//! CLI entry point for the manga-dl tool.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use manga_dl_core::LibraryConfig;
use manga_dl_core::config::resolve_default_config_path;
use tracing::debug;

mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config_path = resolve_config_path(args.config.clone())?;
    let config = LibraryConfig::load(&config_path).with_context(|| {
        format!(
            "failed to load config from {} (create it or pass --config <path>)",
            config_path.display()
        )
    })?;
    debug!(manga_dir = %config.manga_dir.display(), "config loaded");

    match &args.command {
        Command::List => commands::run_list_command(&config),
        Command::Show { series } => commands::run_show_command(&config, series),
        Command::Search { title } => commands::run_search_command(&config, title).await,
        Command::Download(download) => {
            commands::run_download_command(config, download, args.quiet).await
        }
        Command::Update {
            series,
            throttle_ms,
        } => commands::run_update_command(config, series, *throttle_ms, args.quiet).await,
        Command::Remove { series, yes } => commands::run_remove_command(&config, series, *yes),
        Command::Config => commands::run_config_show_command(&config_path, &config),
    }
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(resolve_default_config_path)
        .context("cannot locate a config file: set HOME or XDG_CONFIG_HOME, or pass --config <path>")
}
