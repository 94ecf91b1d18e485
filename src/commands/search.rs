//! Search command handler: query the enabled sites for a title.

use anyhow::Result;
use manga_dl_core::{LibraryConfig, SiteRegistry};

pub async fn run_search_command(config: &LibraryConfig, title: &str) -> Result<()> {
    let registry = SiteRegistry::from_settings(&config.sites)?;
    let enabled = registry.enabled(&config.sites.enabled)?;
    let (site, results) = registry.search(title, &enabled).await?;

    println!("{} result(s) from {site}:", results.len());
    for (rank, series) in results.iter().enumerate() {
        let chapters = series
            .chapter_count
            .map_or_else(String::new, |count| format!("  ({count} chapters)"));
        println!("{:>3}. {}{chapters}", rank + 1, series.title);
        if !series.alt_titles.is_empty() {
            println!("     also: {}", series.alt_titles.join(", "));
        }
    }
    Ok(())
}
