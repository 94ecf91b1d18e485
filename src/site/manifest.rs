//! Provider backed by local JSON manifests.
//!
//! Each `*.json` file in the manifest directory describes one series:
//!
//! ```json
//! {
//!   "title": "Blame!",
//!   "alt_titles": ["Blame"],
//!   "chapters": [
//!     { "chapter": "1", "volume": "1", "title": "Net Sphere",
//!       "pages": ["https://img.example/blame/1/1.jpg", null] }
//!   ]
//! }
//! ```
//!
//! A `null` page is a page whose image is gone upstream.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ImageResource, RemoteChapter, RemotePage, RemoteSeries, SiteError, SiteId, SiteProvider};
use crate::template::NumericKey;

#[derive(Debug, Deserialize)]
struct Manifest {
    title: String,
    #[serde(default)]
    alt_titles: Vec<String>,
    #[serde(default)]
    chapters: Vec<ManifestChapter>,
}

#[derive(Debug, Deserialize)]
struct ManifestChapter {
    chapter: String,
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    pages: Vec<Option<String>>,
}

/// Serves series described by JSON manifest files.
#[derive(Debug, Clone)]
pub struct ManifestProvider {
    dir: PathBuf,
}

impl ManifestProvider {
    /// Creates a provider reading manifests from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the manifest directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn manifest_paths(&self) -> Result<Vec<PathBuf>, SiteError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| SiteError::io(&self.dir, e))?;
        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SiteError::io(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

async fn read_manifest(path: &Path) -> Result<Manifest, SiteError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SiteError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|source| SiteError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_key(path: &Path, value: &str) -> Result<NumericKey, SiteError> {
    value.parse().map_err(|_| SiteError::InvalidManifest {
        path: path.to_path_buf(),
        reason: format!("'{value}' is not a chapter or volume number"),
    })
}

/// Splits a chapter locator `<manifest path>#<chapter key>`.
fn split_chapter_url(url: &str) -> Result<(PathBuf, NumericKey), SiteError> {
    let not_found = || SiteError::ChapterNotFound {
        url: url.to_string(),
    };
    let (path, key) = url.rsplit_once('#').ok_or_else(not_found)?;
    let key = key.parse().map_err(|_| not_found())?;
    Ok((PathBuf::from(path), key))
}

fn matches_title(manifest: &Manifest, needle: &str) -> bool {
    std::iter::once(&manifest.title)
        .chain(&manifest.alt_titles)
        .any(|title| title.to_lowercase().contains(needle))
}

#[async_trait]
impl SiteProvider for ManifestProvider {
    fn id(&self) -> SiteId {
        SiteId::Manifest
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn search(&self, title: &str) -> Result<Vec<RemoteSeries>, SiteError> {
        let needle = title.trim().to_lowercase();
        let mut results = Vec::new();
        for path in self.manifest_paths().await? {
            let manifest = read_manifest(&path).await?;
            if !matches_title(&manifest, &needle) {
                continue;
            }
            debug!(path = %path.display(), title = %manifest.title, "manifest matched");
            results.push(RemoteSeries {
                title: manifest.title,
                url: path.display().to_string(),
                alt_titles: manifest.alt_titles,
                chapter_count: Some(manifest.chapters.len()),
            });
        }
        Ok(results)
    }

    #[instrument(skip(self, series), fields(series = %series.title))]
    async fn chapters(&self, series: &RemoteSeries) -> Result<Vec<RemoteChapter>, SiteError> {
        let path = PathBuf::from(&series.url);
        let manifest = read_manifest(&path).await?;
        let mut chapters = Vec::with_capacity(manifest.chapters.len());
        for entry in &manifest.chapters {
            let key = parse_key(&path, &entry.chapter)?;
            let volume = entry
                .volume
                .as_deref()
                .map(|v| parse_key(&path, v))
                .transpose()?;
            chapters.push(RemoteChapter {
                series: manifest.title.clone(),
                volume,
                url: format!("{}#{key}", series.url),
                key,
                title: entry.title.clone(),
            });
        }
        chapters.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(chapters)
    }

    #[instrument(skip(self, chapter), fields(chapter = %chapter.key))]
    async fn pages(&self, chapter: &RemoteChapter) -> Result<Vec<RemotePage>, SiteError> {
        let (path, key) = split_chapter_url(&chapter.url)?;
        let manifest = read_manifest(&path).await?;
        let mut found = None;
        for entry in &manifest.chapters {
            if parse_key(&path, &entry.chapter)?.numeric_eq(&key) {
                found = Some(entry);
                break;
            }
        }
        let entry = found.ok_or_else(|| SiteError::ChapterNotFound {
            url: chapter.url.clone(),
        })?;

        Ok(entry
            .pages
            .iter()
            .enumerate()
            .map(|(idx, image)| RemotePage {
                index: idx + 1,
                url: format!("{}/{}", chapter.url, idx + 1),
                image: image.as_deref().map(ImageResource::new),
            })
            .collect())
    }
}
