//! Remote content providers.
//!
//! A provider searches one source site and enumerates its chapters and pages.
//! Providers are selected by name from configuration through [`SiteRegistry`],
//! in the configured priority order.
//!
//! # Architecture
//!
//! - [`SiteProvider`] - async capability each site implements
//! - [`RemoteSeries`], [`RemoteChapter`], [`RemotePage`], [`ImageResource`] - remote data
//! - [`SiteId`] - the fixed set of known sites
//! - [`SiteRegistry`] - `SiteId` to provider lookup and prioritized search
//! - [`ManifestProvider`] - provider backed by local JSON manifests
//!
//! # Example
//!
//! ```no_run
//! use manga_dl_core::site::{ManifestProvider, SiteId, SiteRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = SiteRegistry::new();
//! registry.register(Box::new(ManifestProvider::new("/srv/manga-manifests")));
//!
//! let enabled = registry.enabled(&["manifest".to_string()])?;
//! let (site, results) = registry.search("blame", &enabled).await?;
//! let provider = registry.get(site).ok_or("provider vanished")?;
//! let chapters = provider.chapters(&results[0]).await?;
//! println!("{} chapters", chapters.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod manifest;
mod registry;

pub use error::SiteError;
pub use manifest::ManifestProvider;
pub use registry::SiteRegistry;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::template::NumericKey;

/// The known source sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SiteId {
    /// Local JSON manifests ([`ManifestProvider`]).
    Manifest,
}

impl SiteId {
    /// Every known site.
    pub const ALL: [SiteId; 1] = [SiteId::Manifest];

    /// Returns the configuration name of the site.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteId {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SiteError::UnknownSite {
                name: s.to_string(),
            })
    }
}

/// A series found by a site search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSeries {
    /// Display title.
    pub title: String,
    /// Site-specific locator for the series.
    pub url: String,
    /// Alternative titles.
    pub alt_titles: Vec<String>,
    /// Chapter count, when the search result reports it.
    pub chapter_count: Option<usize>,
}

/// A chapter of a remote series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteChapter {
    /// Display name of the owning series.
    pub series: String,
    /// Volume grouping, when the site has one.
    pub volume: Option<NumericKey>,
    /// Chapter key, possibly fractional.
    pub key: NumericKey,
    /// Chapter title.
    pub title: String,
    /// Site-specific locator for the chapter.
    pub url: String,
}

/// One page of a remote chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    /// 1-based position in the chapter.
    pub index: usize,
    /// Site-specific locator for the page.
    pub url: String,
    /// The page image, when already known.
    pub image: Option<ImageResource>,
}

/// A fetchable page image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    /// The image URL.
    pub url: String,
}

impl ImageResource {
    /// Creates an image resource.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Capability implemented by each supported site.
///
/// Chapter and page enumeration may perform network I/O; callers make no
/// assumption about whether a provider is eager or lazy.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Box<dyn SiteProvider>` in [`SiteRegistry`].
#[async_trait]
pub trait SiteProvider: Send + Sync {
    /// Returns the site this provider serves.
    fn id(&self) -> SiteId;

    /// Searches for series by title.
    async fn search(&self, title: &str) -> Result<Vec<RemoteSeries>, SiteError>;

    /// Lists a series' chapters in ascending key order.
    async fn chapters(&self, series: &RemoteSeries) -> Result<Vec<RemoteChapter>, SiteError>;

    /// Lists a chapter's pages in reading order.
    async fn pages(&self, chapter: &RemoteChapter) -> Result<Vec<RemotePage>, SiteError>;

    /// Resolves the image for a page, or `None` if the page has none.
    ///
    /// The default returns the image already attached to the page.
    async fn image(&self, page: &RemotePage) -> Result<Option<ImageResource>, SiteError> {
        Ok(page.image.clone())
    }
}
