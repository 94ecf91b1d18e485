//! Chapter download pipeline.
//!
//! Saving a chapter runs strictly in order: render the directory names, create
//! the directories, refresh the layout sidecar, then fetch each page one at a
//! time with a throttle pause between pages. Nothing is rolled back on
//! failure; pages already written stay on disk and the library index picks up
//! whatever is present.

use std::path::PathBuf;

use tracing::{debug, info, instrument};
use url::Url;

use super::client::HttpClient;
use super::error::PipelineError;
use super::progress::ProgressObserver;
use super::throttle::Throttle;
use crate::config::{LibraryConfig, NamingTemplates};
use crate::sidecar::{LayoutMatchers, write_sidecar};
use crate::site::{RemoteChapter, SiteProvider};
use crate::template::{FieldSet, NumericKey, Placeholder, TemplateError, sanitize_segment};

/// Extension used when the image URL does not carry one.
pub const DEFAULT_PAGE_EXTENSION: &str = "jpg";

/// Outcome of a successful [`DownloadPipeline::save_chapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedChapter {
    /// The chapter directory.
    pub path: PathBuf,
    /// Number of page files written.
    pub pages_written: usize,
}

/// Saves remote chapters into the collection tree.
#[derive(Debug)]
pub struct DownloadPipeline {
    root: PathBuf,
    templates: NamingTemplates,
    matchers: LayoutMatchers,
    client: HttpClient,
    throttle: Throttle,
}

impl DownloadPipeline {
    /// Creates a pipeline for the configured root, templates, and throttle.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Template`] if a layout matcher cannot be derived.
    pub fn new(config: &LibraryConfig, client: HttpClient) -> Result<Self, PipelineError> {
        Ok(Self {
            root: config.manga_dir.clone(),
            matchers: LayoutMatchers::derive(&config.templates)?,
            templates: config.templates.clone(),
            client,
            throttle: Throttle::new(config.throttle),
        })
    }

    /// Returns the inter-page throttle.
    #[must_use]
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Renders the series and chapter directories for `chapter`.
    ///
    /// The series name and chapter title are passed through
    /// [`sanitize_segment`] first; a missing volume renders as `0`.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] if any level fails to render.
    pub fn chapter_paths(&self, chapter: &RemoteChapter) -> Result<(PathBuf, PathBuf), TemplateError> {
        let fields = FieldSet::new()
            .with_text(Placeholder::Series, sanitize_segment(&chapter.series))
            .with_number(
                Placeholder::Volume,
                chapter.volume.clone().unwrap_or_else(|| NumericKey::from_index(0)),
            )
            .with_number(Placeholder::Chapter, chapter.key.clone())
            .with_text(Placeholder::Title, sanitize_segment(&chapter.title));

        let series_dir = self.root.join(self.templates.series.render(&fields)?);
        let chapter_dir = series_dir
            .join(self.templates.volume.render(&fields)?)
            .join(self.templates.chapter.render(&fields)?);
        Ok((series_dir, chapter_dir))
    }

    /// Downloads every page of `chapter` into its directory.
    ///
    /// The layout sidecar, which also records the unsanitized series title, is
    /// written before any page is requested, so the series stays indexable
    /// even if a page fails. Saving the same chapter
    /// again overwrites its pages and is not an error.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ImageResourceUnavailable`] as soon as a page has no
    ///   image; later pages are not attempted
    /// - [`PipelineError::Download`] if a page fetch fails (no retry)
    /// - [`PipelineError::Site`] if the provider cannot enumerate pages
    /// - [`PipelineError::Template`], [`PipelineError::Io`],
    ///   [`PipelineError::Sidecar`] for local failures
    #[instrument(skip(self, provider, chapter, observer), fields(series = %chapter.series, chapter = %chapter.key))]
    pub async fn save_chapter(
        &self,
        provider: &dyn SiteProvider,
        chapter: &RemoteChapter,
        observer: &dyn ProgressObserver,
    ) -> Result<SavedChapter, PipelineError> {
        let (series_dir, chapter_dir) = self.chapter_paths(chapter)?;
        tokio::fs::create_dir_all(&chapter_dir)
            .await
            .map_err(|source| PipelineError::Io {
                path: chapter_dir.clone(),
                source,
            })?;
        write_sidecar(&series_dir, &self.matchers, Some(&chapter.series))?;

        let pages = provider.pages(chapter).await?;
        let total = pages.len();
        debug!(total, dir = %chapter_dir.display(), "fetching pages");

        for (idx, page) in pages.iter().enumerate() {
            let position = idx + 1;
            let image = provider.image(page).await?.ok_or_else(|| {
                PipelineError::ImageResourceUnavailable {
                    chapter: chapter.key.clone(),
                    page: position,
                }
            })?;

            let fields = FieldSet::new()
                .with_number(Placeholder::Page, NumericKey::from_index(position))
                .with_text(Placeholder::Ext, page_extension(&image.url));
            let file = chapter_dir.join(self.templates.page.render(&fields)?);
            self.client.fetch_to_file(&image.url, &file).await?;

            observer.on_page(position, total);
            if position < total {
                self.throttle.pause().await;
            }
        }

        info!(pages = total, dir = %chapter_dir.display(), "chapter saved");
        Ok(SavedChapter {
            path: chapter_dir,
            pages_written: total,
        })
    }
}

/// Returns the lowercase file extension of an image URL's last path segment,
/// or [`DEFAULT_PAGE_EXTENSION`].
#[must_use]
pub fn page_extension(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            let segment = parsed.path_segments()?.next_back()?.to_string();
            let (stem, ext) = segment.rsplit_once('.')?;
            let valid = !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.bytes().all(|b| b.is_ascii_alphanumeric());
            valid.then(|| ext.to_ascii_lowercase())
        })
        .unwrap_or_else(|| DEFAULT_PAGE_EXTENSION.to_string())
}
