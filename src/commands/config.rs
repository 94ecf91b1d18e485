//! Config command handler: show effective configuration.

use std::path::Path;

use anyhow::Result;
use manga_dl_core::LibraryConfig;

pub fn run_config_show_command(config_path: &Path, config: &LibraryConfig) -> Result<()> {
    println!("config_path = {}", config_path.display());
    println!("manga_dir = {}", config.manga_dir.display());
    println!("series_dir = {}", config.templates.series.source());
    println!("volume_dir = {}", config.templates.volume.source());
    println!("chapter_dir = {}", config.templates.chapter.source());
    println!("page_filename = {}", config.templates.page.source());
    println!("throttle_ms = {}", config.throttle.as_millis());
    println!("sites = {}", config.sites.enabled.join(", "));
    println!(
        "manifest_dir = {}",
        config
            .sites
            .manifest_dir
            .as_ref()
            .map_or_else(|| "<unset>".to_string(), |dir| dir.display().to_string())
    );
    Ok(())
}
