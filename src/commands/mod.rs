//! CLI command handlers.

mod config;
mod download;
mod library;
mod search;

pub use config::run_config_show_command;
pub use download::{run_download_command, run_update_command};
pub use library::{run_list_command, run_remove_command, run_show_command};
pub use search::run_search_command;
