//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use manga_dl_core::NumericKey;

/// Download manga into a template-organized local library.
///
/// Directory and file names are rendered from the templates in the config
/// file, and existing trees are indexed back through the same templates.
#[derive(Parser, Debug)]
#[command(name = "manga-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file (default: $XDG_CONFIG_HOME/manga-dl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Actions.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every series in the local library
    List,

    /// Show the volumes, chapters and page counts of a local series
    Show {
        /// Series name (case-insensitive)
        series: String,
    },

    /// Search the enabled sites for a title
    Search {
        /// Title to search for
        title: String,
    },

    /// Download a series, or selected chapters of it
    Download(DownloadArgs),

    /// Download the chapters of a local series that are not on disk yet
    Update {
        /// Series name (case-insensitive)
        series: String,

        /// Pause between page requests in milliseconds (overrides the config file)
        #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(0..=60_000))]
        throttle_ms: Option<u64>,
    },

    /// Delete a local series and all of its files
    Remove {
        /// Series name (case-insensitive)
        series: String,

        /// Delete without asking; otherwise only report what would be deleted
        #[arg(long)]
        yes: bool,
    },

    /// Print the effective configuration
    Config,
}

/// Arguments for `download`.
#[derive(ClapArgs, Debug)]
pub struct DownloadArgs {
    /// Title to search for
    pub title: String,

    /// Chapter to download (repeatable; default: all chapters)
    #[arg(short = 'c', long = "chapter", value_name = "KEY")]
    pub chapters: Vec<NumericKey>,

    /// Pause between page requests in milliseconds (overrides the config file)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(0..=60_000))]
    pub throttle_ms: Option<u64>,
}
