//! Chapter downloads: the fetch-to-file primitive and the page pipeline.
//!
//! # Features
//!
//! - Streaming page fetches (memory-efficient for large images)
//! - Sequential execution: one page request in flight at a time
//! - Fixed throttle between pages, none after the last
//! - Layout sidecar refreshed before the first page
//! - Progress observer called after each page
//!
//! # Example
//!
//! ```no_run
//! use manga_dl_core::config::LibraryConfig;
//! use manga_dl_core::download::{DownloadPipeline, HttpClient};
//! use manga_dl_core::site::{ManifestProvider, SiteProvider};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LibraryConfig::load(Path::new("config.toml"))?;
//! let pipeline = DownloadPipeline::new(&config, HttpClient::new()?)?;
//! let provider = ManifestProvider::new("/srv/manga-manifests");
//!
//! let series = provider.search("blame").await?.remove(0);
//! for chapter in provider.chapters(&series).await? {
//!     let saved = pipeline.save_chapter(&provider, &chapter, &()).await?;
//!     println!("{} pages in {}", saved.pages_written, saved.path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod pipeline;
mod progress;
mod throttle;

pub use client::HttpClient;
pub use error::{DownloadError, PipelineError};
pub use pipeline::{DEFAULT_PAGE_EXTENSION, DownloadPipeline, SavedChapter, page_extension};
pub use progress::{IndicatifProgress, ProgressObserver};
pub use throttle::Throttle;
