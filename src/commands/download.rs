//! Download command handlers: `download` and `update`.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use manga_dl_core::download::IndicatifProgress;
use manga_dl_core::site::RemoteChapter;
use manga_dl_core::workflow::{best_match, missing_chapters, select_chapters};
use manga_dl_core::{
    DownloadPipeline, HttpClient, LibraryConfig, LibraryIndex, PipelineError, SiteProvider,
    SiteRegistry,
};
use tracing::{info, warn};

use crate::cli::DownloadArgs;

pub async fn run_download_command(
    config: LibraryConfig,
    args: &DownloadArgs,
    quiet: bool,
) -> Result<()> {
    let config = apply_throttle_override(config, args.throttle_ms);
    let registry = SiteRegistry::from_settings(&config.sites)?;
    let enabled = registry.enabled(&config.sites.enabled)?;
    let (site, results) = registry.search(&args.title, &enabled).await?;
    let Some(series) = best_match(&results, &args.title) else {
        bail!("no search results for {:?}", args.title);
    };
    let provider = registry
        .get(site)
        .with_context(|| format!("site {site} is not registered"))?;
    info!(site = %site, title = %series.title, "selected series");

    let remote = provider.chapters(series).await?;
    let (selected, unmatched) = select_chapters(&remote, &args.chapters);
    for key in &unmatched {
        warn!(chapter = %key, title = %series.title, "chapter not available upstream");
    }
    if selected.is_empty() {
        println!("Nothing to download for {}.", series.title);
        return Ok(());
    }

    let pipeline = DownloadPipeline::new(&config, HttpClient::new()?)?;
    let saved = download_chapters(&pipeline, provider, &selected, quiet).await?;
    println!("Downloaded {saved} chapter(s) of {}.", series.title);
    Ok(())
}

pub async fn run_update_command(
    config: LibraryConfig,
    name: &str,
    throttle_ms: Option<u64>,
    quiet: bool,
) -> Result<()> {
    let config = apply_throttle_override(config, throttle_ms);
    let local = LibraryIndex::new(&config)?.load(name)?;
    let title = local.display_title().to_string();

    let registry = SiteRegistry::from_settings(&config.sites)?;
    let enabled = registry.enabled(&config.sites.enabled)?;
    let (site, results) = registry.search(&title, &enabled).await?;
    let Some(series) = best_match(&results, &title) else {
        bail!("no search results for {title:?}");
    };
    let provider = registry
        .get(site)
        .with_context(|| format!("site {site} is not registered"))?;

    // Save under the local title so new chapters land in the existing tree.
    let remote: Vec<RemoteChapter> = provider
        .chapters(series)
        .await?
        .into_iter()
        .map(|chapter| RemoteChapter {
            series: title.clone(),
            ..chapter
        })
        .collect();
    let missing = missing_chapters(&local, &remote);
    if missing.is_empty() {
        println!("{title} is up to date.");
        return Ok(());
    }
    info!(series = %title, missing = missing.len(), "updating series");

    let pipeline = DownloadPipeline::new(&config, HttpClient::new()?)?;
    let saved = download_chapters(&pipeline, provider, &missing, quiet).await?;
    println!("Downloaded {saved} new chapter(s) of {title}.");
    Ok(())
}

fn apply_throttle_override(config: LibraryConfig, throttle_ms: Option<u64>) -> LibraryConfig {
    match throttle_ms {
        Some(ms) => config.with_throttle(Duration::from_millis(ms)),
        None => config,
    }
}

/// Saves `chapters` in order, one progress bar per chapter.
///
/// Stops at the first failure. A page without an image aborts the whole run
/// since the title has most likely been taken down.
async fn download_chapters(
    pipeline: &DownloadPipeline,
    provider: &dyn SiteProvider,
    chapters: &[&RemoteChapter],
    quiet: bool,
) -> Result<usize> {
    let mut saved = 0;
    for chapter in chapters {
        let progress = if quiet {
            IndicatifProgress::hidden()
        } else {
            IndicatifProgress::new(format!("Chapter {}", chapter.key))
        };
        let result = pipeline
            .save_chapter(provider, chapter, &progress)
            .await;
        progress.finish();

        match result {
            Ok(done) => {
                info!(
                    chapter = %chapter.key,
                    pages = done.pages_written,
                    dir = %done.path.display(),
                    "chapter complete"
                );
                saved += 1;
            }
            Err(error @ PipelineError::ImageResourceUnavailable { .. }) => {
                warn!(series = %chapter.series, "{error}; stopping");
                return Err(error.into());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to save chapter {}", chapter.key));
            }
        }
    }
    Ok(saved)
}
